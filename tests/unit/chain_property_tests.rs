#[cfg(test)]
mod tests_chain_properties {
    use pipeline_rs::{Operation, PipelineError, Sequencer, Status};
    use proptest::prelude::*;
    use std::cell::Cell;

    /// One step of a randomly generated chain.
    #[derive(Debug, Clone)]
    enum Step {
        /// Add `n` to the payload.
        Add(i64),
        /// Fail a transform with the given tag.
        FailTransform(u8),
        /// Evaluate successfully.
        Evaluate,
        /// Fail a validation with the given tag.
        FailValidate(u8),
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            4 => (-100i64..100).prop_map(Step::Add),
            1 => any::<u8>().prop_map(Step::FailTransform),
            2 => Just(Step::Evaluate),
            1 => any::<u8>().prop_map(Step::FailValidate),
        ]
    }

    /// Reference model: the payload and fault after running `steps`.
    fn model(steps: &[Step]) -> (Option<i64>, Option<PipelineError>) {
        let mut payload: Option<i64> = None;
        for step in steps {
            match step {
                Step::Add(n) => payload = Some(payload.unwrap_or(0) + n),
                Step::Evaluate => {}
                Step::FailTransform(tag) => {
                    return (
                        payload,
                        Some(PipelineError::step(
                            Operation::Transform,
                            format!("transform {tag}"),
                        )),
                    );
                }
                Step::FailValidate(tag) => {
                    return (
                        payload,
                        Some(PipelineError::step(
                            Operation::Validate,
                            format!("validate {tag}"),
                        )),
                    );
                }
            }
        }
        (payload, None)
    }

    fn run(pipeline: &Sequencer<i64>, steps: &[Step], invoked: &Cell<usize>) {
        for step in steps {
            match step {
                Step::Add(n) => {
                    pipeline.transform(|data| {
                        invoked.set(invoked.get() + 1);
                        Ok(data.copied().unwrap_or(0) + n)
                    });
                }
                Step::Evaluate => {
                    pipeline.evaluate((), |_, _| {
                        invoked.set(invoked.get() + 1);
                        Ok(())
                    });
                }
                Step::FailTransform(tag) => {
                    pipeline.transform(|_| {
                        invoked.set(invoked.get() + 1);
                        Err(format!("transform {tag}").into())
                    });
                }
                Step::FailValidate(tag) => {
                    pipeline.validate((), |_, _| {
                        invoked.set(invoked.get() + 1);
                        Err(format!("validate {tag}").into())
                    });
                }
            }
        }
    }

    proptest! {
        #[test]
        fn first_fault_wins_and_payload_freezes(
            steps in prop::collection::vec(step_strategy(), 0..40)
        ) {
            let pipeline: Sequencer<i64> = Sequencer::new();
            let invoked = Cell::new(0usize);
            run(&pipeline, &steps, &invoked);

            let (expected_payload, expected_fault) = model(&steps);
            prop_assert_eq!(pipeline.data(), expected_payload);
            prop_assert_eq!(pipeline.error(), expected_fault.clone());

            // Effects run up to and including the first failing step only.
            let first_failure = steps
                .iter()
                .position(|s| matches!(s, Step::FailTransform(_) | Step::FailValidate(_)));
            let expected_calls = first_failure.map_or(steps.len(), |i| i + 1);
            prop_assert_eq!(invoked.get(), expected_calls);

            let expected_status = if expected_fault.is_some() {
                Status::Faulted
            } else {
                Status::Running
            };
            prop_assert_eq!(pipeline.status(), expected_status);
        }

        #[test]
        fn faulted_pipeline_ignores_any_suffix(
            prefix in prop::collection::vec(step_strategy(), 0..10),
            suffix in prop::collection::vec(step_strategy(), 0..20)
        ) {
            let pipeline: Sequencer<i64> = Sequencer::new();
            let invoked = Cell::new(0usize);
            run(&pipeline, &prefix, &invoked);
            pipeline.transform(|_| Err("barrier".into()));

            let frozen = (pipeline.data(), pipeline.error());
            let calls_before = invoked.get();
            run(&pipeline, &suffix, &invoked);

            prop_assert_eq!(invoked.get(), calls_before);
            prop_assert_eq!((pipeline.data(), pipeline.error()), frozen);
        }
    }
}
