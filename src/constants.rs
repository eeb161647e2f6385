// TagVault - Constantes globales
//
// Ce module centralise les constantes cryptographiques de la crate :
// tailles de bloc, de cle, de nonce et de tag, et borne de longueur
// imposee par le compteur 32 bits du mode GCM.
//
// Les constantes sont utilisees par les modules aes, ghash, ctr et gcm
// pour garantir la coherence des valeurs.

/// Taille d'un bloc AES / GCM (octets)
pub const BLOCK_SIZE: usize = 16;

/// Taille cle AES-128 (octets)
pub const AES_KEY_SIZE: usize = 16;

/// Taille du tag complet, non tronque (octets)
pub const TAG_SIZE: usize = 16;

/// Taille minimale de tag acceptee (octets).
/// NIST SP 800-38D recommande 12 au minimum ; descendre jusqu'a 6 est un
/// mode degrade explicite pour les canaux a bande passante contrainte
/// (resistance a la falsification reduite a ~2^-48).
pub const MIN_TAG_SIZE: usize = 6;

/// Taille standard du nonce GCM (octets)
pub const STANDARD_NONCE_SIZE: usize = 12;

/// Longueur maximale d'un message : (2^32 - 2) blocs de 16 octets.
/// Au-dela, le compteur bas 32 bits bouclerait au sein d'un meme message.
pub const MAX_PLAINTEXT_SIZE: u64 = ((1u64 << 32) - 2) * BLOCK_SIZE as u64;
