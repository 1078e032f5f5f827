#[cfg(test)]
mod tests_dataset_pipeline {
    use pipeline_rs::{BoxError, PayloadCodec, PipelineConfig, PipelineError, Records, Sequencer};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    const IRIS: &str = "\
5.1,3.5,1.4,0.2,Iris-setosa
4.9,3.0,1.4,0.2,Iris-setosa
7.0,3.2,4.7,1.4,Iris-versicolor
6.4,3.2,4.5,1.5,Iris-versicolor
6.3,3.3,6.0,2.5,Iris-virginica
5.8,2.7,5.1,1.9,Iris-virginica
";

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        features: [f64; 4],
        class: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Dataset {
        samples: Vec<Sample>,
        centroids: BTreeMap<String, [f64; 4]>,
    }

    fn encode(records: Records) -> Result<Dataset, BoxError> {
        let mut samples = Vec::with_capacity(records.len());
        for row in records {
            if row.len() != 5 {
                return Err(format!("expected 5 fields, got {}", row.len()).into());
            }
            let mut features = [0.0; 4];
            for (slot, field) in features.iter_mut().zip(&row[..4]) {
                *slot = field.parse()?;
            }
            samples.push(Sample {
                features,
                class: row[4].clone(),
            });
        }
        Ok(Dataset {
            samples,
            centroids: BTreeMap::new(),
        })
    }

    fn with_centroids(data: Option<&Dataset>) -> Result<Dataset, BoxError> {
        let mut data = data.cloned().ok_or("no dataset loaded")?;
        let mut sums: BTreeMap<String, ([f64; 4], f64)> = BTreeMap::new();
        for sample in &data.samples {
            let entry = sums.entry(sample.class.clone()).or_insert(([0.0; 4], 0.0));
            for (acc, value) in entry.0.iter_mut().zip(sample.features) {
                *acc += value;
            }
            entry.1 += 1.0;
        }
        data.centroids = sums
            .into_iter()
            .map(|(class, (sum, n))| (class, sum.map(|s| s / n)))
            .collect();
        Ok(data)
    }

    fn nearest(data: &Dataset, features: [f64; 4]) -> Option<String> {
        data.centroids
            .iter()
            .map(|(class, centroid)| {
                let dist: f64 = centroid
                    .iter()
                    .zip(features)
                    .map(|(c, f)| (c - f) * (c - f))
                    .sum();
                (class.clone(), dist)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(class, _)| class)
    }

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("iris.csv");
        std::fs::write(&path, IRIS).expect("write iris fixture");
        (dir, path)
    }

    #[test]
    fn full_pipeline_organize_transform_evaluate_save_load_validate() {
        let (dir, csv) = fixture();
        let saved = dir.path().join("iris.bin");

        let training: Sequencer<Dataset> = Sequencer::new();
        training
            .organize(&csv, encode)
            .transform(with_centroids)
            .evaluate([6.9, 3.1, 4.9, 1.5], |features, data| {
                let data = data.ok_or("no dataset")?;
                match nearest(data, features).as_deref() {
                    Some("Iris-versicolor") => Ok(()),
                    other => Err(format!("unexpected prediction {other:?}").into()),
                }
            })
            .save(&saved);
        assert_eq!(training.error(), None);

        let serving: Sequencer<Dataset> = Sequencer::new();
        serving
            .load(&saved, PayloadCodec::Bincode.decoder())
            .validate(0.8, |threshold: f64, data| {
                let data = data.ok_or("no dataset")?;
                let hits = data
                    .samples
                    .iter()
                    .filter(|s| nearest(data, s.features).as_deref() == Some(s.class.as_str()))
                    .count();
                let accuracy = hits as f64 / data.samples.len() as f64;
                if accuracy >= threshold {
                    Ok(())
                } else {
                    Err(format!("accuracy {accuracy:.2} below {threshold}").into())
                }
            });

        assert_eq!(serving.error(), None);
        assert_eq!(serving.data(), training.data());
        assert_eq!(serving.data().map(|d| d.centroids.len()), Some(3));
    }

    #[test]
    fn encode_rejection_is_first_fault() {
        let (dir, _) = fixture();
        let ragged = dir.path().join("ragged.csv");
        std::fs::write(&ragged, "5.1,3.5,1.4,0.2,Iris-setosa\n4.9,3.0,Iris-setosa\n")
            .expect("write ragged fixture");

        let pipeline: Sequencer<Dataset> = Sequencer::new();
        pipeline
            .organize(&ragged, encode)
            .transform(with_centroids)
            .save(dir.path().join("never.bin"));

        assert_eq!(
            pipeline.error().map(|e| e.to_string()),
            Some("expected 5 fields, got 3".to_string())
        );
        assert!(pipeline.data().is_none());
        assert!(!dir.path().join("never.bin").exists());
    }

    #[test]
    fn transform_on_empty_pipeline_faults() {
        let pipeline: Sequencer<Dataset> = Sequencer::new();
        pipeline.transform(with_centroids);
        assert_eq!(
            pipeline.error().map(|e| e.to_string()),
            Some("no dataset loaded".to_string())
        );
    }

    #[test]
    fn json_codec_from_config_file() {
        let (dir, csv) = fixture();
        let config = PipelineConfig::from_json(r#"{ "codec": "json" }"#).expect("config");
        let saved = dir.path().join("iris.json");

        let pipeline: Sequencer<Dataset> = Sequencer::with_config(config);
        pipeline.organize(&csv, encode).save(&saved);
        assert!(pipeline.error().is_none());

        let text = std::fs::read_to_string(&saved).expect("saved json");
        assert!(text.contains("Iris-virginica"));

        let reloaded: Sequencer<Dataset> = Sequencer::new();
        reloaded.load(&saved, PayloadCodec::Json.decoder());
        assert_eq!(reloaded.data(), pipeline.data());
    }

    #[test]
    fn loading_with_the_wrong_codec_faults() {
        let (dir, csv) = fixture();
        let saved = dir.path().join("iris.bin");

        let writer: Sequencer<Dataset> = Sequencer::new();
        writer.organize(&csv, encode).save(&saved);

        let reader: Sequencer<Dataset> = Sequencer::new();
        reader.load(&saved, PayloadCodec::Json.decoder());
        assert!(matches!(
            reader.error(),
            Some(PipelineError::Deserialization { .. })
        ));
        assert!(reader.data().is_none());
    }
}
