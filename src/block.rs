// TagVault - Interface de chiffrement par bloc
//
// Le mode GCM ne consomme le chiffrement par bloc qu'a travers une seule
// operation : chiffrer un bloc de 128 bits sous une cle fixe. Ce module
// definit cette interface sous forme de trait, resolu statiquement par
// monomorphisation.
//
// Toute implementation (AES-128 fourni par la crate, ou un bloc externe)
// expose cette capacite explicitement ; le choix se fait au niveau des
// types, jamais par inspection du type a l'execution.

use crate::constants::BLOCK_SIZE;

/// Permutation 128 bits a cle fixe, consommee par le mode GCM.
///
/// Contrat : `encrypt_block` est une fonction pure de l'etat immuable de
/// l'implementation ; elle peut etre appelee concurremment sans verrou.
pub trait BlockCipher {
    /// Chiffre un bloc de 16 octets et retourne le resultat.
    fn encrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE];
}
