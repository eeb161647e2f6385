// TagVault - Types d'erreur centralises
//
// Ce module definit l'enumeration `TvError` et le type alias
// `TvResult<T>` utilises dans toute la crate.
//
// # Taxonomie a deux niveaux
// - `Config` : mauvaise utilisation par l'appelant (taille de tag hors
//   bornes, nonce de longueur nulle, nonce de longueur incorrecte a
//   l'appel, message depassant la borne du compteur). Erreur immediate
//   et explicite, jamais a reessayer.
// - `Auth` : echec de verification du tag ou entree plus courte que le
//   tag configure. Resultat attendu face a une entree corrompue ou
//   hostile ; erreur ordinaire et recuperable.
//
// # Securite
// `Auth` ne transporte volontairement AUCUN detail : distinguer "entree
// tronquee" de "tag invalide" fournirait un oracle a un attaquant. Tout
// echec de dechiffrement se presente comme un unique "decryption failed".

use std::fmt;

/// Enumeration des erreurs possibles dans TagVault.
#[derive(Debug, PartialEq, Eq)]
pub enum TvError {
    /// Mauvaise utilisation par l'appelant (configuration ou appel invalide)
    Config(String),
    /// Echec d'authentification (sans detail, par construction)
    Auth,
}

impl fmt::Display for TvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TvError::Config(m) => write!(f, "[Config] {}", m),
            TvError::Auth => write!(f, "[Auth] decryption failed"),
        }
    }
}

impl std::error::Error for TvError {}

/// Type Result specialise pour TagVault.
pub type TvResult<T> = Result<T, TvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_config() {
        let e = TvError::Config("incorrect tag size given to GCM".into());
        assert_eq!(e.to_string(), "[Config] incorrect tag size given to GCM");
    }

    #[test]
    fn test_display_auth_is_generic() {
        // Le message Auth est fixe : aucun detail ne doit filtrer.
        assert_eq!(TvError::Auth.to_string(), "[Auth] decryption failed");
    }
}
