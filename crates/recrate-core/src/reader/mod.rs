//! Readers tipados, uno por archivo fuente del árbol extraído.
//!
//! Política de fallas (uniforme salvo la plantilla): archivo ausente,
//! ilegible o malformado degrada a estructuras vacías y deja rastro en el
//! sink de warnings; el pipeline continúa. La plantilla de job es la única
//! lectura fatal, porque la reescritura no tiene modo parcial sin ella.

pub mod datasets;
pub mod invocation;
pub mod metadata;
pub mod template;

pub use datasets::read_manifest;
pub use invocation::read_invocation;
pub use metadata::read_metadata;
pub use template::read_template;
