// TagVault - Controleur AEAD AES-GCM a tag tronque
// Reference : NIST SP 800-38D ; troncature du tag selon l'appendice B
//
// Ce module orchestre la construction GCM complete : derivation du
// compteur initial a partir du nonce, authentification des donnees
// associees, chiffrement compteur, calcul/troncature/verification du tag.
//
// # Architecture
// - `Gcm<C>` est generique sur le chiffrement par bloc via le trait
//   `BlockCipher`, resolu statiquement (monomorphisation) : aucune
//   inspection de type a l'execution
// - L'etat derive (table de produits GHASH) est calcule une fois a la
//   construction puis immuable : une meme instance est utilisable
//   concurremment par plusieurs threads sans verrou
//
// # Securite
// - La comparaison du tag est en temps constant (constant_time::ct_eq)
// - Open ne dechiffre qu'APRES verification reussie du tag : aucun
//   octet de plaintext non authentifie n'est jamais materialise
// - Le tag tronque est un prefixe strict du tag complet de 16 octets ;
//   descendre sous 12 octets reduit la resistance a la falsification
//   (~2^-(8t)) et releve d'un choix explicite de l'appelant
// - Les intermediaires sensibles (tag complet avant troncature, masque
//   E_K(J0), compteur initial) sont effaces de la pile avant retour
// - Le recouvrement partiel entre buffers d'entree et de sortie est
//   rendu inexprimable par l'exclusivite des &mut ; le recouvrement
//   exact (chiffrement sur place) passe par les methodes *_in_place

use crate::block::BlockCipher;
use crate::constant_time::{ct_eq, secure_zero_slice};
use crate::constants::{BLOCK_SIZE, MAX_PLAINTEXT_SIZE, MIN_TAG_SIZE, STANDARD_NONCE_SIZE, TAG_SIZE};
use crate::ctr::{ctr_xor, derive_counter};
use crate::error::{TvError, TvResult};
use crate::ghash::{GfElement, ProductTable};

/// Instance AEAD GCM construite autour d'un chiffrement par bloc.
/// Immuable apres construction ; `Send + Sync` des que `C` l'est.
pub struct Gcm<C: BlockCipher> {
    cipher: C,
    table: ProductTable,
    nonce_size: usize,
    tag_size: usize,
}

impl<C: BlockCipher> Gcm<C> {
    /// Construit un GCM standard : nonce de 12 octets, tag de 16 octets.
    pub fn new(cipher: C) -> TvResult<Self> {
        Self::with_sizes(cipher, STANDARD_NONCE_SIZE, TAG_SIZE)
    }

    /// Construit un GCM a tag tronque (nonce standard de 12 octets).
    /// Une taille sous 12 octets est un mode a securite reduite, a
    /// reserver aux canaux contraints en bande passante.
    pub fn with_tag_size(cipher: C, tag_size: usize) -> TvResult<Self> {
        Self::with_sizes(cipher, STANDARD_NONCE_SIZE, tag_size)
    }

    /// Construit un GCM a nonce de longueur non standard (tag complet).
    pub fn with_nonce_size(cipher: C, nonce_size: usize) -> TvResult<Self> {
        Self::with_sizes(cipher, nonce_size, TAG_SIZE)
    }

    /// Construit un GCM avec nonce et tag de tailles configurees.
    /// Echoue avec `Config` si tag_size n'est pas dans [6, 16] ou si
    /// nonce_size est nul. Derive la sous-cle H et la table de produits.
    pub fn with_sizes(cipher: C, nonce_size: usize, tag_size: usize) -> TvResult<Self> {
        if !(MIN_TAG_SIZE..=TAG_SIZE).contains(&tag_size) {
            return Err(TvError::Config(format!(
                "incorrect tag size given to GCM: {}",
                tag_size
            )));
        }
        if nonce_size == 0 {
            return Err(TvError::Config(
                "the nonce can't have zero length, or the security of the key will be immediately compromised".into(),
            ));
        }

        // H = E_K(0^128), calcule une seule fois
        let h = cipher.encrypt_block(&[0u8; BLOCK_SIZE]);
        let table = ProductTable::new(&h);

        Ok(Self { cipher, table, nonce_size, tag_size })
    }

    /// Longueur de nonce attendue par Seal et Open.
    pub fn nonce_size(&self) -> usize {
        self.nonce_size
    }

    /// Surcout ajoute par Seal : la taille du tag configuree.
    pub fn overhead(&self) -> usize {
        self.tag_size
    }

    /// Chiffre et authentifie `plaintext` avec `aad` comme donnees
    /// associees. Retourne ciphertext || tag tronque.
    ///
    /// Les octets de ciphertext sont identiques a ceux d'un GCM standard
    /// non tronque pour les memes (cle, nonce, plaintext) ; seul le tag
    /// est raccourci.
    pub fn seal(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> TvResult<Vec<u8>> {
        self.check_nonce(nonce)?;
        self.check_message_len(plaintext.len())?;

        let mut j0 = derive_counter(&self.table, nonce);

        let mut out = Vec::with_capacity(plaintext.len() + self.tag_size);
        out.extend_from_slice(plaintext);
        ctr_xor(&self.cipher, &j0, &mut out);

        let mut tag = self.compute_tag(&j0, aad, &out);
        out.extend_from_slice(&tag[..self.tag_size]);

        // Les octets de tag au-dela de la troncature restent secrets :
        // les connaitre permettrait de forger a une taille superieure
        secure_zero_slice(&mut tag);
        secure_zero_slice(&mut j0);
        Ok(out)
    }

    /// Variante sur place de Seal : chiffre `buffer` dans lui-meme
    /// (recouvrement exact entree/sortie) et retourne le tag tronque,
    /// detache, a transmettre a la suite du ciphertext.
    pub fn seal_in_place(&self, nonce: &[u8], buffer: &mut [u8], aad: &[u8]) -> TvResult<Vec<u8>> {
        self.check_nonce(nonce)?;
        self.check_message_len(buffer.len())?;

        let mut j0 = derive_counter(&self.table, nonce);
        ctr_xor(&self.cipher, &j0, buffer);

        let mut tag = self.compute_tag(&j0, aad, buffer);
        let out = tag[..self.tag_size].to_vec();
        secure_zero_slice(&mut tag);
        secure_zero_slice(&mut j0);
        Ok(out)
    }

    /// Verifie puis dechiffre `ciphertext_and_tag` (ciphertext suivi du
    /// tag tronque). Retourne le plaintext, ou `Auth` sans autre detail
    /// si la verification echoue.
    ///
    /// Le dechiffrement n'a lieu qu'apres comparaison reussie du tag :
    /// en cas d'echec, aucun octet dechiffre n'a ete produit.
    pub fn open(&self, nonce: &[u8], ciphertext_and_tag: &[u8], aad: &[u8]) -> TvResult<Vec<u8>> {
        self.check_nonce(nonce)?;

        if ciphertext_and_tag.len() < self.tag_size {
            return Err(TvError::Auth);
        }
        let ct_len = ciphertext_and_tag.len() - self.tag_size;
        if ct_len as u64 > MAX_PLAINTEXT_SIZE {
            return Err(TvError::Auth);
        }
        let (ciphertext, tag) = ciphertext_and_tag.split_at(ct_len);

        let mut j0 = derive_counter(&self.table, nonce);
        let mut expected = self.compute_tag(&j0, aad, ciphertext);
        let tag_ok = ct_eq(&expected[..self.tag_size], tag);

        // Le tag complet recalcule contient les octets secrets au-dela
        // de la troncature : efface avant tout retour
        secure_zero_slice(&mut expected);
        if !tag_ok {
            secure_zero_slice(&mut j0);
            return Err(TvError::Auth);
        }

        let mut plaintext = ciphertext.to_vec();
        ctr_xor(&self.cipher, &j0, &mut plaintext);
        secure_zero_slice(&mut j0);
        Ok(plaintext)
    }

    /// Variante sur place de Open : `buffer` contient ciphertext || tag.
    /// Apres verification reussie, le prefixe est dechiffre dans le
    /// buffer lui-meme et retourne. En cas d'echec, le buffer n'est pas
    /// modifie et `Auth` est retourne.
    pub fn open_in_place<'a>(
        &self,
        nonce: &[u8],
        buffer: &'a mut [u8],
        aad: &[u8],
    ) -> TvResult<&'a mut [u8]> {
        self.check_nonce(nonce)?;

        if buffer.len() < self.tag_size {
            return Err(TvError::Auth);
        }
        let ct_len = buffer.len() - self.tag_size;
        if ct_len as u64 > MAX_PLAINTEXT_SIZE {
            return Err(TvError::Auth);
        }

        let mut j0 = derive_counter(&self.table, nonce);
        let tag_ok = {
            let (ciphertext, tag) = buffer.split_at(ct_len);
            let mut expected = self.compute_tag(&j0, aad, ciphertext);
            let ok = ct_eq(&expected[..self.tag_size], tag);
            secure_zero_slice(&mut expected);
            ok
        };
        if !tag_ok {
            secure_zero_slice(&mut j0);
            return Err(TvError::Auth);
        }

        let plaintext = &mut buffer[..ct_len];
        ctr_xor(&self.cipher, &j0, plaintext);
        secure_zero_slice(&mut j0);
        Ok(plaintext)
    }

    /// Calcule le tag complet de 16 octets : GHASH sur AAD puis
    /// ciphertext, finalisation par les longueurs en bits, masquage par
    /// E_K(J0).
    fn compute_tag(&self, j0: &[u8; BLOCK_SIZE], aad: &[u8], ciphertext: &[u8]) -> [u8; TAG_SIZE] {
        let mut tag_mask = self.cipher.encrypt_block(j0);

        let mut y = GfElement::default();
        self.table.update(&mut y, aad);
        self.table.update(&mut y, ciphertext);
        let tag = self.table.finish(
            &mut y,
            &tag_mask,
            aad.len() as u64 * 8,
            ciphertext.len() as u64 * 8,
        );

        // E_K(J0) vaut keystream : efface apres usage
        secure_zero_slice(&mut tag_mask);
        tag
    }

    fn check_nonce(&self, nonce: &[u8]) -> TvResult<()> {
        if nonce.len() != self.nonce_size {
            return Err(TvError::Config(format!(
                "incorrect nonce length given to GCM: expected {}, got {}",
                self.nonce_size,
                nonce.len()
            )));
        }
        Ok(())
    }

    fn check_message_len(&self, len: usize) -> TvResult<()> {
        if len as u64 > MAX_PLAINTEXT_SIZE {
            return Err(TvError::Config("message too large for GCM".into()));
        }
        Ok(())
    }
}
