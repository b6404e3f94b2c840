//! Configuración de una corrida desde variables de entorno.
//! Usa la convención `RECRATE_*`; `.env` se carga una sola vez.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Política frente a múltiples candidatos para un mismo rol de archivo
/// dentro del árbol extraído (varios `.ga`, varios manifiestos, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Usa el primer candidato en orden lexicográfico de ruta y registra un
    /// warning con los descartados.
    #[default]
    FirstByPath,
    /// Falla la corrida antes de leer nada.
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub ambiguity: AmbiguityPolicy,
}

impl RunConfig {
    /// Lee `RECRATE_AMBIGUITY` (`first` | `error`). Valores desconocidos
    /// caen en `first`.
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let ambiguity = match env::var("RECRATE_AMBIGUITY").ok().as_deref() {
            Some("error") => AmbiguityPolicy::Error,
            Some("first") | None => AmbiguityPolicy::FirstByPath,
            Some(other) => {
                log::warn!("RECRATE_AMBIGUITY={other} no reconocido, usando `first`");
                AmbiguityPolicy::FirstByPath
            }
        };
        Self { ambiguity }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
