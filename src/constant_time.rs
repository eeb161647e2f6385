// TagVault - Hygiene contre les canaux auxiliaires
//
// Ce module regroupe les deux utilitaires sensibles au timing et a la
// remanence memoire :
// - `ct_eq` : comparaison en temps constant, pour la verification du tag
// - `secure_zero_slice` : effacement non optimisable, pour les cles de
//   round et la table de produits a la destruction
//
// # Securite
// Une comparaison de tag avec sortie anticipee revele, par le temps
// d'execution, la position du premier octet divergent : un attaquant
// peut alors forger un tag octet par octet. `ct_eq` accumule les
// differences par OR et ne retourne qu'apres avoir lu tous les octets.

/// Comparaison en temps constant de deux slices de meme longueur.
/// Le temps d'execution ne depend ni de la position ni de l'existence
/// d'une difference. Les longueurs comparees ici sont publiques (taille
/// de tag configuree) ; une difference de longueur retourne false.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for i in 0..a.len() {
        diff |= a[i] ^ b[i];
    }
    diff == 0
}

/// Efface un slice de maniere non optimisable.
/// L'ecriture volatile octet par octet empeche le compilateur de
/// supprimer le zeroing comme ecriture "morte" ; la barriere SeqCst
/// garantit la visibilite des ecritures.
pub fn secure_zero_slice(s: &mut [u8]) {
    for byte in s.iter_mut() {
        // SAFETY: le pointeur provient d'une reference mutable valide ;
        // l'ecriture volatile interdit l'elision par l'optimiseur.
        unsafe {
            std::ptr::write_volatile(byte as *mut u8, 0);
        }
    }
    std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
}
