use demos::{IrisModel, setup_logger};
use pipeline_rs::prelude::*;
use std::error::Error;
use std::path::Path;
use tracing::{info, warn};

const DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/iris.csv");

fn main() -> Result<(), Box<dyn Error>> {
    setup_logger();
    let out_dir = std::env::temp_dir().join("pipeline-rs-demo");
    std::fs::create_dir_all(&out_dir)?;
    let model_path = out_dir.join("iris.bin");

    // Train: organize the CSV, fit centroids, check one prediction, persist.
    let training: Sequencer<IrisModel> = Sequencer::new();
    training
        .organize(DATA, IrisModel::from_records)
        .transform(|model| model.ok_or("nothing organized")?.fit())
        .evaluate([6.1, 2.9, 4.7, 1.4], |features, model| {
            let model = model.ok_or("no model")?;
            let predicted = model.predict(features).ok_or("model has no classes")?;
            info!("prediction for {features:?}: {predicted}");
            Ok(())
        })
        .save(&model_path);

    if let Some(err) = training.error() {
        warn!("training failed: {err}");
        return Err(err.into());
    }
    info!(
        "trained on {} flowers, model written to {}",
        training.with_data(|m| m.map_or(0, |m| m.flowers.len())),
        model_path.display()
    );

    // Serve: load the persisted model and validate its accuracy.
    let serving: Sequencer<IrisModel> = Sequencer::new();
    serving
        .load(&model_path, PayloadCodec::Bincode.decoder())
        .validate(0.9, |threshold: f64, model| {
            let accuracy = model.ok_or("no model")?.accuracy();
            info!("training accuracy: {:.1}%", accuracy * 100.0);
            if accuracy < threshold {
                return Err(format!("accuracy {accuracy:.2} below {threshold:.2}").into());
            }
            Ok(())
        });

    // A chain that fails early: every later step is skipped.
    let broken: Sequencer<IrisModel> = Sequencer::new();
    broken
        .organize(Path::new("does/not/exist.csv"), IrisModel::from_records)
        .transform(|model| model.ok_or("nothing organized")?.fit())
        .save(out_dir.join("never-written.bin"));
    info!(
        "broken pipeline status: {}, error: {:?}",
        broken.status(),
        broken.error().map(|e| e.to_string())
    );

    let model = serving.into_result()?;
    info!(
        "served model with {} classes",
        model.map_or(0, |m| m.centroids.len())
    );
    Ok(())
}
