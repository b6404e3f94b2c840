//! Corrida completa sobre un árbol sintético: escaneo, lectura, join,
//! normalización, reporte y reescritura.

use std::fs;
use std::path::Path;

use recrate_core::{reconcile_tree, InvocationStatus, ReconcileError, RunConfig};
use serde_json::json;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, content).expect("write fixture");
}

/// Árbol mínimo con las cuatro fuentes más metadata y los datasets físicos.
fn seed_tree(root: &Path) {
    write(root, "variant_analysis.ga", "{\"a_galaxy_workflow\": \"true\", \"name\": \"Variant analysis\"}");

    let invocation = json!([{
        "state": "scheduled",
        "create_time": "2024-05-06T07:08:09.123456",
        "input_parameters": [
            {"model_class": "WorkflowRequestInputParameter", "value": "{'threshold': 5}"},
            {"model_class": "WorkflowRequestInputParameter", "value": "false"},
            {"model_class": "WorkflowRequestStepState", "value": "'ignored'"}
        ],
        "step_states": [
            {"order_index": 0, "value": {
                "__job_resource": "x",
                "chromInfo": "\"/galaxy/chrom/?.len\"",
                "threshold": "\"5\"",
                "adv": "{\"mode\": \"fast\", \"seed\": 7}"
            }},
            {"order_index": 1, "value": {"title": "\"My plot\""}}
        ],
        "input_datasets": [
            {"dataset": {"encoded_id": "abc"}, "order_index": 0}
        ],
        "output_datasets": [
            {"dataset": {"encoded_id": "xyz"}, "order_index": 0,
             "workflow_output": {"label": "plot"}}
        ]
    }]);
    write(root, "invocation_attrs.txt", &invocation.to_string());

    let datasets = json!([
        {"encoded_id": "abc", "file_name": "datasets/in.csv"},
        {"encoded_id": "xyz", "file_name": "datasets/out.png"},
        {"encoded_id": "zzz", "file_name": "datasets/unreferenced.dat"}
    ]);
    write(root, "datasets_attrs.txt", &datasets.to_string());

    write(
        root,
        "variant_analysis_job.yml",
        "- job:\n    input_table:\n      class: File\n      path: seed/in.csv\n    threshold: 5\n  outputs:\n    plot:\n      class: File\n      path: seed/out.png\n",
    );

    let metadata = json!({
        "@graph": [
            {"@id": "variant_analysis.ga",
             "@type": ["File", "ComputationalWorkflow"],
             "name": "Variant analysis",
             "input": [{"@id": "#table"}],
             "output": [{"@id": "#plot"}]},
            {"@id": "#table", "@type": "FormalParameter", "name": "table", "additionalType": "File"},
            {"@id": "#plot", "@type": "FormalParameter", "name": "plot", "additionalType": "File"}
        ]
    });
    write(root, "ro-crate-metadata.json", &metadata.to_string());

    write(root, "datasets/in.csv", "a,b\n1,2\n");
    write(root, "datasets/out.png", "png");
}

#[test]
fn end_to_end_reconciliation_and_rewrite() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let root = tmp.path();
    seed_tree(root);

    let rec = reconcile_tree(root, &RunConfig::default()).expect("reconcile");
    assert_eq!(rec.invocation.status, InvocationStatus::Scheduled);
    assert!(rec.create_time().is_some());

    // join: orden de las referencias, ids no referenciados fuera
    assert_eq!(rec.resolved.inputs, vec!["datasets/in.csv"]);
    assert_eq!(rec.resolved.outputs, vec!["datasets/out.png"]);

    // normalización: privados y reservados fuera, comillas y JSON embebido resueltos
    assert_eq!(rec.parameters.get("threshold"), Some(&json!("5")));
    assert_eq!(rec.parameters.get("adv"), Some(&json!({"mode": "fast", "seed": 7})));
    assert_eq!(rec.parameters.get("title"), Some(&json!("My plot")));
    assert!(rec.parameters.get("__job_resource").is_none());
    assert!(rec.parameters.get("chromInfo").is_none());

    // parámetros del request: literal evaluado, "false" saltado
    assert_eq!(rec.workflow_parameters, vec![json!({"threshold": 5})]);

    // reporte
    let report_path = rec.write_report(root).expect("report");
    let report = fs::read_to_string(report_path).expect("read report");
    assert!(report.contains("**Workflow:** Variant analysis"));
    assert!(report.contains("threshold"));
    assert!(report.contains("datasets/in.csv"));

    // reescritura
    let artifacts = rec.rewrite_job(root).expect("rewrite");
    let wf = fs::read_to_string(&artifacts.workflow_file).expect("read workflow copy");
    assert!(wf.contains("a_galaxy_workflow"));

    let job_text = fs::read_to_string(&artifacts.job_file).expect("read job");
    let job: serde_yaml::Value = serde_yaml::from_str(&job_text).expect("job yaml");
    let input_path = job
        .get("input_table")
        .and_then(|v| v.get("path"))
        .and_then(|v| v.as_str())
        .expect("input_table.path");
    assert_eq!(input_path, root.join("datasets/in.csv").to_string_lossy());
    assert_eq!(job.get("threshold").and_then(|v| v.as_i64()), Some(5));
    // sólo la sección job se serializa
    assert!(job.get("plot").is_none());
}

#[test]
fn underflow_aborts_without_writing_the_job_file() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let root = tmp.path();
    seed_tree(root);
    // plantilla con dos slots de input, pero sólo un dataset resuelto
    write(
        root,
        "variant_analysis_job.yml",
        "- job:\n    input_table:\n      class: File\n      path: seed/in.csv\n    second_table:\n      class: File\n      path: seed/in2.csv\n  outputs: {}\n",
    );

    let rec = reconcile_tree(root, &RunConfig::default()).expect("reconcile");
    let out = tempfile::tempdir().expect("outdir");
    let err = rec.rewrite_job(out.path());
    match err {
        Err(ReconcileError::SlotUnderflow { key, .. }) => assert_eq!(key, "second_table"),
        other => panic!("expected SlotUnderflow, got {other:?}"),
    }
    assert!(!out.path().join("workflow_input_params.yml").exists(), "no partial job file");
    // la copia del workflow ocurre antes de evaluar los slots (contrato)
    assert!(out.path().join("workflow.ga").exists());
}

#[test]
fn missing_sources_degrade_but_template_absence_is_fatal() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let root = tmp.path();
    // sólo el workflow presente
    write(root, "wf.ga", "{}");

    let rec = reconcile_tree(root, &RunConfig::default()).expect("reconcile");
    assert!(rec.invocation.is_empty());
    assert!(rec.resolved.inputs.is_empty());
    assert!(rec.parameters.is_empty());
    assert!(!rec.warnings.is_empty(), "degradations leave a trace");

    // el reporte parcial sigue disponible
    rec.write_report(root).expect("partial report");

    let err = rec.rewrite_job(root);
    assert!(matches!(err, Err(ReconcileError::MissingEntry(_))));
}

#[test]
fn template_with_no_file_slots_is_idempotent() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let root = tmp.path();
    seed_tree(root);
    write(root, "variant_analysis_job.yml", "- job:\n    threshold: 5\n    label: run one\n  outputs: {}\n");

    let rec = reconcile_tree(root, &RunConfig::default()).expect("reconcile");
    let artifacts = rec.rewrite_job(root).expect("rewrite");
    let job: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(&artifacts.job_file).expect("read job"))
            .expect("job yaml");
    let expected: serde_yaml::Value =
        serde_yaml::from_str("threshold: 5\nlabel: run one\n").expect("expected yaml");
    assert_eq!(job, expected, "no spurious mutation without file slots");
}
