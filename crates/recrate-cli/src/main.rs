use std::env;
use std::path::PathBuf;

use recrate_core::{reconcile_tree, DirectoryUnpacker, RunConfig, Unpacker};

fn main() {
    // Cargar .env si existe para obtener RECRATE_*
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: recrate <rocrate_path> <output_dir>");
        eprintln!("Example: recrate downloaded_rocrate/d5430aa5-7a8b-44fe-8d21-6a7c80ac36d4 downloaded_workflows");
        std::process::exit(1);
    }
    let archive = PathBuf::from(&args[1]);
    let output_dir = PathBuf::from(&args[2]);

    if !archive.exists() {
        eprintln!("[recrate] error: archive not found: {}", archive.display());
        return;
    }

    let config = RunConfig::from_env();

    // Materializar el árbol del crate dentro del directorio de salida. Otros
    // formatos de contenedor requieren un Unpacker externo.
    let root = match DirectoryUnpacker.unpack(&archive, &output_dir) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("[recrate] unpack error: {e}");
            return;
        }
    };

    println!("Extracting information from invocation and dataset attribute files");
    let rec = match reconcile_tree(&root, &config) {
        Ok(rec) => rec,
        Err(e) => {
            eprintln!("[recrate] error: {e}");
            return;
        }
    };
    for warning in &rec.warnings {
        eprintln!("[recrate] warning: {warning}");
    }

    match rec.write_report(&output_dir) {
        Ok(path) => println!("Rerun report saved to {}", path.display()),
        Err(e) => eprintln!("[recrate] report error: {e}"),
    }

    println!("Preparing job file from template");
    match rec.rewrite_job(&output_dir) {
        Ok(artifacts) => {
            println!("Workflow copied successfully in {}", artifacts.workflow_file.display());
            println!("Rewritten job saved to {}", artifacts.job_file.display());
        }
        Err(e) => eprintln!("[recrate] rewrite error: {e}"),
    }
}
