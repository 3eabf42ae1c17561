/**
 * =================================================================
 * APARATO: ARGOS INTEGRITY TEST (V2.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE
 * OBJETIVO: Certificar el blindaje de pánicos del observador neural.
 * =================================================================
 */

#[test]
fn certify_panic_shield_installation_is_idempotent() {
    // El escudo puede armarse varias veces sin colapsar el proceso.
    maquette_shared_argos::install_panic_shield("argos_proving_grounds");
    maquette_shared_argos::install_panic_shield("argos_proving_grounds");

    // Un pánico capturado en hilo secundario no derriba al anfitrión.
    let verdict = std::thread::spawn(|| {
        panic!("CONTROLLED_COLLAPSE: proving grounds detonation");
    })
    .join();

    assert!(verdict.is_err(), "El pánico del hilo debe reportarse como Err al anfitrión.");
    println!("✅ ARGOS: Phoenix Shield certified.");
}
