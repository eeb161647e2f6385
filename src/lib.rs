// TagVault - Arbre de modules (crate library)
//
// TagVault implemente le chiffrement authentifie AES-128-GCM avec un tag
// d'authentification tronquable de 6 a 16 octets, pour les canaux ou
// chaque octet de surcout compte. La troncature est un simple prefixe du
// tag complet ; descendre sous les 12 octets recommandes par NIST
// SP 800-38D reduit la resistance a la falsification et releve d'un
// choix explicite de l'appelant.
//
// # Modules
// - `aes`           : chiffrement par bloc AES-128 (FIPS 197), pur Rust
// - `block`         : trait BlockCipher consomme par le mode GCM
// - `constant_time` : comparaison en temps constant et zeroing volatile
// - `constants`     : tailles de bloc, de cle, de nonce et de tag
// - `ctr`           : moteur compteur (keystream GCM)
// - `error`         : types d'erreur centralises (TvError, TvResult)
// - `gcm`           : controleur AEAD (Seal/Open, troncature du tag)
// - `ghash`         : authentificateur GHASH sur GF(2^128)

/// Chiffrement par bloc AES-128 pur Rust (FIPS 197).
pub mod aes;
/// Interface de chiffrement par bloc consommee par le mode GCM.
pub mod block;
/// Comparaison en temps constant et effacement memoire non optimisable.
pub mod constant_time;
/// Constantes cryptographiques globales.
pub mod constants;
/// Moteur compteur du mode GCM.
pub mod ctr;
/// Types d'erreur centralises.
pub mod error;
/// Controleur AEAD AES-GCM a tag tronque.
pub mod gcm;
/// Authentificateur GHASH sur GF(2^128).
pub mod ghash;

pub use aes::Aes128;
pub use block::BlockCipher;
pub use error::{TvError, TvResult};
pub use gcm::Gcm;
