// TagVault - Moteur compteur du mode GCM
// Reference : NIST SP 800-38D, section 6.5 (GCTR)
//
// Ce module genere le keystream GCM : chiffrement de valeurs successives
// d'un bloc compteur de 128 bits, combinees aux donnees par XOR.
//
// # Invariants
// - Seuls les 32 bits bas du compteur sont incrementes (modulo 2^32) ;
//   les 96 bits hauts restent fixes pour toute la duree d'un appel
//   Seal/Open. Le controleur rejette en amont tout message assez long
//   pour faire boucler ces 32 bits.
// - Le bloc compteur initial J0 est reserve au masque de tag
//   (E_K(J0)) et n'est jamais utilise comme keystream : le chiffrement
//   des donnees demarre a inc32(J0).

use crate::block::BlockCipher;
use crate::constants::{BLOCK_SIZE, STANDARD_NONCE_SIZE};
use crate::ghash::{GfElement, ProductTable};

/// Incremente le compteur GCM : 4 derniers octets, big-endian, avec
/// bouclage modulo 2^32. Les 12 premiers octets ne sont jamais touches.
pub fn inc32(counter: &mut [u8; BLOCK_SIZE]) {
    let ctr = u32::from_be_bytes([counter[12], counter[13], counter[14], counter[15]]);
    counter[12..16].copy_from_slice(&ctr.wrapping_add(1).to_be_bytes());
}

/// Derive le bloc compteur initial J0 a partir du nonce.
/// - Nonce de 12 octets (standard) : J0 = nonce || 0x00000001.
/// - Toute autre longueur : J0 = GHASH(nonce), soit l'absorption du nonce
///   complete de zeros puis le bloc de longueurs (0, bits du nonce), via
///   la meme table de produits que l'authentification.
pub fn derive_counter(table: &ProductTable, nonce: &[u8]) -> [u8; BLOCK_SIZE] {
    let mut j0 = [0u8; BLOCK_SIZE];

    if nonce.len() == STANDARD_NONCE_SIZE {
        j0[..STANDARD_NONCE_SIZE].copy_from_slice(nonce);
        j0[BLOCK_SIZE - 1] = 1;
    } else {
        let mut y = GfElement::default();
        table.update(&mut y, nonce);
        j0 = table.finish(&mut y, &[0u8; BLOCK_SIZE], 0, nonce.len() as u64 * 8);
    }

    j0
}

/// Chiffre ou dechiffre `data` sur place en mode compteur a partir de
/// inc32(J0). L'operation est son propre inverse.
pub fn ctr_xor<C: BlockCipher>(cipher: &C, j0: &[u8; BLOCK_SIZE], data: &mut [u8]) {
    if data.is_empty() {
        return;
    }

    let mut counter = *j0;
    inc32(&mut counter);

    for chunk in data.chunks_mut(BLOCK_SIZE) {
        let keystream = cipher.encrypt_block(&counter);
        inc32(&mut counter);

        for (d, k) in chunk.iter_mut().zip(keystream.iter()) {
            *d ^= k;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::Aes128;

    #[test]
    fn test_inc32_basic() {
        let mut counter = [0u8; 16];
        inc32(&mut counter);
        assert_eq!(&counter[12..], &[0, 0, 0, 1]);
        inc32(&mut counter);
        assert_eq!(&counter[12..], &[0, 0, 0, 2]);
    }

    #[test]
    fn test_inc32_wraps_low_32_bits_only() {
        let mut counter = [0xFFu8; 16];
        inc32(&mut counter);
        // Les 32 bits bas bouclent a zero, les 96 bits hauts sont intacts
        assert_eq!(&counter[..12], &[0xFF; 12]);
        assert_eq!(&counter[12..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_derive_counter_standard_nonce() {
        let aes = Aes128::new(&[0u8; 16]);
        let h = aes.encrypt_block(&[0u8; 16]);
        let table = ProductTable::new(&h);

        let nonce = [0xABu8; 12];
        let j0 = derive_counter(&table, &nonce);
        assert_eq!(&j0[..12], &nonce);
        assert_eq!(&j0[12..], &[0, 0, 0, 1]);
    }

    #[test]
    fn test_derive_counter_nonstandard_nonce() {
        let aes = Aes128::new(&[0u8; 16]);
        let h = aes.encrypt_block(&[0u8; 16]);
        let table = ProductTable::new(&h);

        // Un nonce non standard passe par GHASH : deterministe, et
        // different du chemin standard.
        let j0a = derive_counter(&table, &[0xABu8; 8]);
        let j0b = derive_counter(&table, &[0xABu8; 8]);
        assert_eq!(j0a, j0b);
        assert_ne!(j0a, derive_counter(&table, &[0xABu8; 12]));
    }

    #[test]
    fn test_ctr_xor_is_involutive() {
        let aes = Aes128::new(&[0x42u8; 16]);
        let j0 = [0x07u8; 16];

        let original: Vec<u8> = (0..45).map(|i| i as u8).collect();
        let mut data = original.clone();
        ctr_xor(&aes, &j0, &mut data);
        assert_ne!(data, original);
        ctr_xor(&aes, &j0, &mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn test_ctr_xor_empty() {
        let aes = Aes128::new(&[0x42u8; 16]);
        let j0 = [0u8; 16];
        let mut data: [u8; 0] = [];
        ctr_xor(&aes, &j0, &mut data);
    }
}
