//! Plantilla de job: secciones `job` y `outputs` tal como se leyeron.
//!
//! Las secciones se conservan como `serde_yaml::Mapping` porque el orden de
//! claves de la plantilla original debe sobrevivir intacto hasta la
//! serialización del job reescrito.

use serde_yaml::{Mapping, Value};

use crate::constants::FILE_CLASS;

#[derive(Debug, Clone, Default)]
pub struct JobTemplate {
    pub job: Mapping,
    pub outputs: Mapping,
}

impl JobTemplate {
    /// Cantidad de descriptores de archivo en una sección (slots a sustituir).
    pub fn file_slot_count(section: &Mapping) -> usize {
        section.iter().filter(|(_, v)| is_file_descriptor(v)).count()
    }
}

/// Un descriptor de archivo es un mapeo con clave `path` y `class: File`.
/// Todo lo demás es un parámetro escalar ya final que se deja intacto.
pub fn is_file_descriptor(value: &Value) -> bool {
    let Value::Mapping(m) = value else {
        return false;
    };
    let path_key = Value::String("path".to_string());
    let class_key = Value::String("class".to_string());
    m.contains_key(&path_key)
        && m.get(&class_key).and_then(Value::as_str) == Some(FILE_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).expect("test yaml")
    }

    #[test]
    fn file_descriptor_requires_path_and_file_class() {
        assert!(is_file_descriptor(&yaml("{class: File, path: a.csv}")));
        assert!(!is_file_descriptor(&yaml("{class: Directory, path: d}")));
        assert!(!is_file_descriptor(&yaml("{class: File}")));
        assert!(!is_file_descriptor(&yaml("5")));
        assert!(!is_file_descriptor(&yaml("plain")));
    }

    #[test]
    fn file_slot_count_ignores_scalars() {
        let doc = yaml("{a: {class: File, path: x}, b: 3, c: {class: File, path: y}}");
        let Value::Mapping(m) = doc else { panic!("mapping expected") };
        assert_eq!(JobTemplate::file_slot_count(&m), 2);
    }
}
