//! Join por identificador entre la invocación y el manifiesto de datasets.

use crate::model::{DatasetManifest, DatasetRef, ResolvedDatasetSet};

/// Resuelve un rol: referencias en orden ascendente de `order_index` (empates
/// por orden original, sort estable), buscando cada identificador en el
/// manifiesto. Las referencias sin entrada en el manifiesto se omiten con un
/// warning; no son un error.
fn resolve_role(
    manifest: &DatasetManifest,
    refs: &[DatasetRef],
    warnings: &mut Vec<String>,
) -> Vec<String> {
    let mut ordered: Vec<&DatasetRef> = refs.iter().collect();
    ordered.sort_by_key(|r| r.order_index);

    let mut names = Vec::with_capacity(ordered.len());
    for r in ordered {
        match manifest.lookup(&r.dataset_id) {
            Some(file_name) => names.push(file_name.to_string()),
            None => warnings.push(format!(
                "{} dataset `{}` not present in manifest, dropped",
                r.role, r.dataset_id
            )),
        }
    }
    names
}

/// Produce el `ResolvedDatasetSet` de una invocación completa.
pub fn resolve_datasets(
    manifest: &DatasetManifest,
    input_refs: &[DatasetRef],
    output_refs: &[DatasetRef],
    warnings: &mut Vec<String>,
) -> ResolvedDatasetSet {
    ResolvedDatasetSet {
        inputs: resolve_role(manifest, input_refs, warnings),
        outputs: resolve_role(manifest, output_refs, warnings),
    }
}
