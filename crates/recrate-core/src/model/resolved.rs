//! Resultado del join invocación × manifiesto.

/// Dos secuencias ordenadas de nombres de archivo, una por rol. El orden es
/// el de las referencias de la invocación (por `order_index`), nunca el del
/// manifiesto. Derivado, no se persiste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDatasetSet {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}
