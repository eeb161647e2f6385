// TagVault - Authentificateur GHASH sur GF(2^128)
// Reference : NIST SP 800-38D
//
// Ce module implemente l'arithmetique dans GF(2^128) necessaire au tag
// d'authentification du mode GCM, ainsi que l'absorption des donnees
// (AAD puis ciphertext) et la finalisation par le bloc de longueurs.
//
// # Architecture
// - GfElement    : element de GF(2^128) represente comme (hi:u64, lo:u64)
// - ProductTable : 16 multiples precalcules de la sous-cle H, pour une
//   multiplication par fenetre de 4 bits (16 lookups par bloc au lieu de
//   128 iterations bit a bit)
// - update/finish : absorption par blocs de 16 octets puis bloc final
//   des longueurs en bits, le tout selon la convention GCM bit-reflechie
//   avec le polynome de reduction x^128 + x^7 + x^2 + x + 1
//
// # Securite
// Les acces a la table sont indexes par les nibbles de la donnee absorbee
// (publique dans GCM : AAD et ciphertext transitent en clair) ; la table
// elle-meme, derivee de la cle, est effacee a la destruction.

/// Polynome de reduction replie sur le mot haut : x^128 + x^7 + x^2 + x + 1
/// en representation bit-reflechie, soit 0xE1 << 120.
const R_POLY: u64 = 0xE100000000000000;

/// Table de reduction pour la fenetre de 4 bits :
/// REDUCTION[i] = (i * R) >> 120, pre-decale sur le mot haut.
const REDUCTION: [u64; 16] = [
    0x0000000000000000,
    0x1c20000000000000,
    0x3840000000000000,
    0x2460000000000000,
    0x7080000000000000,
    0x6ca0000000000000,
    0x48c0000000000000,
    0x54e0000000000000,
    0xe100000000000000,
    0xfd20000000000000,
    0xd940000000000000,
    0xc560000000000000,
    0x9180000000000000,
    0x8da0000000000000,
    0xa9c0000000000000,
    0xb5e0000000000000,
];

/// Represente un element de GF(2^128) comme deux u64.
/// Convention big-endian : `hi` porte les octets 0..8, `lo` les octets 8..16.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GfElement {
    pub hi: u64,
    pub lo: u64,
}

impl GfElement {
    /// Cree un element a partir de 16 octets (big-endian).
    pub fn from_bytes(b: &[u8; 16]) -> Self {
        Self {
            hi: u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
            lo: u64::from_be_bytes([b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]]),
        }
    }

    /// Convertit en 16 octets (big-endian).
    pub fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    /// XOR de deux elements.
    pub fn xor(self, other: Self) -> Self {
        Self {
            hi: self.hi ^ other.hi,
            lo: self.lo ^ other.lo,
        }
    }

    /// Division par x dans GF(2^128) : decalage a droite d'un bit avec
    /// reduction si le bit sortant (coefficient de x^127) etait a 1.
    fn halve(self) -> Self {
        let carry = self.lo & 1;
        let mut r = Self {
            hi: self.hi >> 1,
            lo: (self.lo >> 1) | (self.hi << 63),
        };
        if carry == 1 {
            r.hi ^= R_POLY;
        }
        r
    }
}

/// Multiples precalcules de la sous-cle de hachage H = AES_K(0^128).
/// Derivee une seule fois a la construction du GCM, puis en lecture
/// seule : partageable entre threads sans verrou.
pub struct ProductTable {
    table: [GfElement; 16],
}

impl ProductTable {
    /// Precalcule les 16 multiples de H pour la multiplication par nibble.
    /// table[n] vaut le produit de H par le nibble n (convention reflechie),
    /// construit par divisions successives puis combinaisons XOR.
    pub fn new(h: &[u8; 16]) -> Self {
        let mut table = [GfElement::default(); 16];
        table[8] = GfElement::from_bytes(h);

        let mut cur = table[8];
        for &idx in &[4usize, 2, 1] {
            cur = cur.halve();
            table[idx] = cur;
        }

        // Les index a plusieurs bits sont des sommes : table[a|b] = table[a] + table[b]
        for i in 2..16usize {
            if i.count_ones() > 1 {
                let msb = if i >= 8 { 8 } else if i >= 4 { 4 } else { 2 };
                table[i] = table[msb].xor(table[i ^ msb]);
            }
        }

        Self { table }
    }

    /// Multiplie `y` par H dans GF(2^128), 4 bits a la fois.
    /// Parcourt les 32 nibbles de y du moins significatif au plus
    /// significatif ; a chaque pas, les 4 bits ejectes du bas de
    /// l'accumulateur sont reinjectes en haut via la table de reduction.
    fn mul(&self, y: &mut GfElement) {
        let mut z = GfElement::default();

        for word in [y.lo, y.hi] {
            let mut w = word;
            for _ in 0..16 {
                let rem = (z.lo & 0xf) as usize;
                z.lo = (z.lo >> 4) | (z.hi << 60);
                z.hi = (z.hi >> 4) ^ REDUCTION[rem];

                let t = self.table[(w & 0xf) as usize];
                z.hi ^= t.hi;
                z.lo ^= t.lo;
                w >>= 4;
            }
        }

        *y = z;
    }

    /// Absorbe un bloc complet : y = (y XOR bloc) * H.
    fn mul_block(&self, y: &mut GfElement, block: &[u8; 16]) {
        *y = y.xor(GfElement::from_bytes(block));
        self.mul(y);
    }

    /// Absorbe `data` dans la valeur courante `y`, bloc de 16 octets par
    /// bloc de 16 octets, le dernier bloc partiel etant complete de zeros.
    pub fn update(&self, y: &mut GfElement, data: &[u8]) {
        for chunk in data.chunks(16) {
            let mut block = [0u8; 16];
            block[..chunk.len()].copy_from_slice(chunk);
            self.mul_block(y, &block);
        }
    }

    /// Absorbe le bloc final des longueurs (en bits, big-endian, 64 bits
    /// chacune) puis masque le resultat par `tag_mask` pour produire la
    /// valeur d'authentification complete de 16 octets.
    pub fn finish(
        &self,
        y: &mut GfElement,
        tag_mask: &[u8; 16],
        aad_bits: u64,
        ct_bits: u64,
    ) -> [u8; 16] {
        y.hi ^= aad_bits;
        y.lo ^= ct_bits;
        self.mul(y);

        let mut out = y.to_bytes();
        for i in 0..16 {
            out[i] ^= tag_mask[i];
        }
        out
    }
}

impl Drop for ProductTable {
    /// Efface les multiples de H (materiau derive de la cle) avant
    /// liberation, via des ecritures volatiles non elidables.
    fn drop(&mut self) {
        for e in self.table.iter_mut() {
            // SAFETY: references mutables valides ; ecriture volatile pour
            // empecher l'optimiseur de supprimer le zeroing.
            unsafe {
                std::ptr::write_volatile(&mut e.hi, 0);
                std::ptr::write_volatile(&mut e.lo, 0);
            }
        }
        std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
    }
}
