// TagVault - Chiffrement par bloc AES-128 pur Rust
// Reference : FIPS 197
//
// Ce module fournit le collaborateur par defaut du mode GCM : la
// permutation AES-128 (10 rounds, cle de 16 octets). Seul le sens
// chiffrement est implemente, GCM n'utilisant jamais le dechiffrement
// de bloc.
//
// # Securite
// - S-Box standard AES, sans table T, pour eviter les attaques par
//   cache timing au prix de performances reduites
// - Les cles de round sont effacees de la memoire a la destruction
//   (ecriture volatile, voir constant_time::secure_zero_slice)

use crate::block::BlockCipher;
use crate::constant_time::secure_zero_slice;
use crate::constants::{AES_KEY_SIZE, BLOCK_SIZE};

// --- AES S-Box ---
const SBOX: [u8; 256] = [
    0x63,0x7c,0x77,0x7b,0xf2,0x6b,0x6f,0xc5,0x30,0x01,0x67,0x2b,0xfe,0xd7,0xab,0x76,
    0xca,0x82,0xc9,0x7d,0xfa,0x59,0x47,0xf0,0xad,0xd4,0xa2,0xaf,0x9c,0xa4,0x72,0xc0,
    0xb7,0xfd,0x93,0x26,0x36,0x3f,0xf7,0xcc,0x34,0xa5,0xe5,0xf1,0x71,0xd8,0x31,0x15,
    0x04,0xc7,0x23,0xc3,0x18,0x96,0x05,0x9a,0x07,0x12,0x80,0xe2,0xeb,0x27,0xb2,0x75,
    0x09,0x83,0x2c,0x1a,0x1b,0x6e,0x5a,0xa0,0x52,0x3b,0xd6,0xb3,0x29,0xe3,0x2f,0x84,
    0x53,0xd1,0x00,0xed,0x20,0xfc,0xb1,0x5b,0x6a,0xcb,0xbe,0x39,0x4a,0x4c,0x58,0xcf,
    0xd0,0xef,0xaa,0xfb,0x43,0x4d,0x33,0x85,0x45,0xf9,0x02,0x7f,0x50,0x3c,0x9f,0xa8,
    0x51,0xa3,0x40,0x8f,0x92,0x9d,0x38,0xf5,0xbc,0xb6,0xda,0x21,0x10,0xff,0xf3,0xd2,
    0xcd,0x0c,0x13,0xec,0x5f,0x97,0x44,0x17,0xc4,0xa7,0x7e,0x3d,0x64,0x5d,0x19,0x73,
    0x60,0x81,0x4f,0xdc,0x22,0x2a,0x90,0x88,0x46,0xee,0xb8,0x14,0xde,0x5e,0x0b,0xdb,
    0xe0,0x32,0x3a,0x0a,0x49,0x06,0x24,0x5c,0xc2,0xd3,0xac,0x62,0x91,0x95,0xe4,0x79,
    0xe7,0xc8,0x37,0x6d,0x8d,0xd5,0x4e,0xa9,0x6c,0x56,0xf4,0xea,0x65,0x7a,0xae,0x08,
    0xba,0x78,0x25,0x2e,0x1c,0xa6,0xb4,0xc6,0xe8,0xdd,0x74,0x1f,0x4b,0xbd,0x8b,0x8a,
    0x70,0x3e,0xb5,0x66,0x48,0x03,0xf6,0x0e,0x61,0x35,0x57,0xb9,0x86,0xc1,0x1d,0x9e,
    0xe1,0xf8,0x98,0x11,0x69,0xd9,0x8e,0x94,0x9b,0x1e,0x87,0xe9,0xce,0x55,0x28,0xdf,
    0x8c,0xa1,0x89,0x0d,0xbf,0xe6,0x42,0x68,0x41,0x99,0x2d,0x0f,0xb0,0x54,0xbb,0x16,
];

/// Constantes de round Rcon pour l'expansion de cle.
const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Nombre de rounds AES-128.
const NR: usize = 10;

/// Nombre de mots de 32 bits dans la cle AES-128.
const NK: usize = 4;

/// Cles de round expandues : 11 blocs de 16 octets = 176 octets.
type RoundKeys = [[u8; 16]; NR + 1];

/// Instance AES-128 a cle fixe.
/// L'expansion de cle est faite une seule fois a la construction ;
/// l'instance est ensuite immuable et partageable entre threads.
pub struct Aes128 {
    round_keys: RoundKeys,
}

impl Aes128 {
    /// Construit une instance a partir d'une cle de 16 octets.
    pub fn new(key: &[u8; AES_KEY_SIZE]) -> Self {
        Self { round_keys: key_expansion(key) }
    }
}

impl BlockCipher for Aes128 {
    fn encrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        let mut state = *block;

        // AddRoundKey initial
        xor_block(&mut state, &self.round_keys[0]);

        // Rounds 1 .. NR-1
        for round in 1..NR {
            sub_bytes(&mut state);
            shift_rows(&mut state);
            mix_columns(&mut state);
            xor_block(&mut state, &self.round_keys[round]);
        }

        // Dernier round (sans MixColumns)
        sub_bytes(&mut state);
        shift_rows(&mut state);
        xor_block(&mut state, &self.round_keys[NR]);

        state
    }
}

impl Drop for Aes128 {
    /// Efface les cles de round avant liberation.
    fn drop(&mut self) {
        for rk in self.round_keys.iter_mut() {
            secure_zero_slice(rk);
        }
    }
}

/// Expansion de la cle AES-128 en cles de round.
fn key_expansion(key: &[u8; AES_KEY_SIZE]) -> RoundKeys {
    let mut w = [0u32; 4 * (NR + 1)];

    // Copier la cle dans les premiers NK mots
    for i in 0..NK {
        w[i] = u32::from_be_bytes([key[4 * i], key[4 * i + 1], key[4 * i + 2], key[4 * i + 3]]);
    }

    for i in NK..w.len() {
        let mut temp = w[i - 1];
        if i % NK == 0 {
            // RotWord + SubWord + Rcon
            temp = sub_word(rot_word(temp)) ^ ((RCON[i / NK - 1] as u32) << 24);
        }
        w[i] = w[i - NK] ^ temp;
    }

    let mut round_keys: RoundKeys = [[0u8; 16]; NR + 1];
    for i in 0..=NR {
        for j in 0..4 {
            let bytes = w[i * 4 + j].to_be_bytes();
            round_keys[i][j * 4..j * 4 + 4].copy_from_slice(&bytes);
        }
    }
    round_keys
}

/// Rotation d'un mot de 32 bits vers la gauche de 8 bits.
const fn rot_word(w: u32) -> u32 {
    (w << 8) | (w >> 24)
}

/// Substitution S-box sur chaque octet d'un mot de 32 bits.
fn sub_word(w: u32) -> u32 {
    let b = w.to_be_bytes();
    u32::from_be_bytes([SBOX[b[0] as usize], SBOX[b[1] as usize], SBOX[b[2] as usize], SBOX[b[3] as usize]])
}

/// SubBytes : substitution S-box sur chaque octet de l'etat.
fn sub_bytes(state: &mut [u8; 16]) {
    for byte in state.iter_mut() {
        *byte = SBOX[*byte as usize];
    }
}

/// ShiftRows : decalage cyclique des lignes de la matrice d'etat.
fn shift_rows(s: &mut [u8; 16]) {
    // Ligne 1 : decalage de 1
    let t = s[1];
    s[1] = s[5]; s[5] = s[9]; s[9] = s[13]; s[13] = t;
    // Ligne 2 : decalage de 2
    let (t0, t1) = (s[2], s[6]);
    s[2] = s[10]; s[6] = s[14]; s[10] = t0; s[14] = t1;
    // Ligne 3 : decalage de 3
    let t = s[15];
    s[15] = s[11]; s[11] = s[7]; s[7] = s[3]; s[3] = t;
}

/// Multiplication par x dans GF(2^8) avec reduction par le polynome AES.
const fn xtime(a: u8) -> u8 {
    let shifted = (a as u16) << 1;
    let reduced = shifted ^ (((a >> 7) as u16) * 0x1b);
    reduced as u8
}

/// MixColumns : melange les colonnes de la matrice d'etat.
/// Forme classique a base de xtime : si t = a0^a1^a2^a3,
/// b_i = a_i ^ t ^ xtime(a_i ^ a_{i+1}).
fn mix_columns(s: &mut [u8; 16]) {
    for i in 0..4 {
        let c = i * 4;
        let (a0, a1, a2, a3) = (s[c], s[c + 1], s[c + 2], s[c + 3]);
        let t = a0 ^ a1 ^ a2 ^ a3;
        s[c] ^= t ^ xtime(a0 ^ a1);
        s[c + 1] ^= t ^ xtime(a1 ^ a2);
        s[c + 2] ^= t ^ xtime(a2 ^ a3);
        s[c + 3] ^= t ^ xtime(a3 ^ a0);
    }
}

/// XOR de deux blocs de 16 octets.
fn xor_block(dst: &mut [u8; 16], src: &[u8; 16]) {
    for i in 0..16 {
        dst[i] ^= src[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aes128_encrypt_block_fips197() {
        // FIPS 197, annexe C.1
        let key: [u8; 16] = [
            0x00,0x01,0x02,0x03,0x04,0x05,0x06,0x07,
            0x08,0x09,0x0a,0x0b,0x0c,0x0d,0x0e,0x0f,
        ];
        let plain: [u8; 16] = [
            0x00,0x11,0x22,0x33,0x44,0x55,0x66,0x77,
            0x88,0x99,0xaa,0xbb,0xcc,0xdd,0xee,0xff,
        ];
        let expected: [u8; 16] = [
            0x69,0xc4,0xe0,0xd8,0x6a,0x7b,0x04,0x30,
            0xd8,0xcd,0xb7,0x80,0x70,0xb4,0xc5,0x5a,
        ];
        let aes = Aes128::new(&key);
        assert_eq!(aes.encrypt_block(&plain), expected);
    }

    #[test]
    fn test_aes128_zero_key_hash_subkey() {
        // H = AES_K(0^128) pour K = 0 : valeur connue, utilisee par GHASH
        let aes = Aes128::new(&[0u8; 16]);
        let h = aes.encrypt_block(&[0u8; 16]);
        let expected: [u8; 16] = [
            0x66,0xe9,0x4b,0xd4,0xef,0x8a,0x2c,0x3b,
            0x88,0x4c,0xfa,0x59,0xca,0x34,0x2b,0x2e,
        ];
        assert_eq!(h, expected);
    }

    #[test]
    fn test_aes128_deterministic() {
        let aes = Aes128::new(&[0x42u8; 16]);
        let block = [0x7fu8; 16];
        assert_eq!(aes.encrypt_block(&block), aes.encrypt_block(&block));
    }
}
