use demos::{IrisModel, setup_logger};
use pipeline_rs::prelude::*;
use std::error::Error;
use std::time::Duration;
use tracing::info;

const DEFAULT_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/iris/iris.data";

fn main() -> Result<(), Box<dyn Error>> {
    setup_logger();
    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());
    let out_dir = std::env::temp_dir().join("pipeline-rs-demo");
    std::fs::create_dir_all(&out_dir)?;
    let raw = out_dir.join("iris.data");

    let config = PipelineConfig::default()
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(30))
        .with_codec(PayloadCodec::Json);

    let pipeline: Sequencer<IrisModel> = Sequencer::with_config(config);
    pipeline
        .gather(&url, &raw)
        .organize(&raw, IrisModel::from_records)
        .transform(|model| model.ok_or("nothing organized")?.fit())
        .save(out_dir.join("iris.json"));

    let model = pipeline.into_result()?.unwrap_or_default();
    info!(
        "fetched {} flowers from {url}, {} classes, accuracy {:.3}",
        model.flowers.len(),
        model.centroids.len(),
        model.accuracy()
    );
    Ok(())
}
