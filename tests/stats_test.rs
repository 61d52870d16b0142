#[cfg(test)]
mod tests {
    use anyhow::Result;
    use biostudy::stats::{self, CI_HIGH, CI_LOW};
    use biostudy::{Biomarker, Participant, PathExpr, Study, StudyStats};

    fn cohort() -> Result<Study> {
        let mut study = Study::new("S");
        for (name, weight) in [("P1", 70.0), ("P2", 80.0)] {
            let mut participant = Participant::new(name);
            participant.add_measurement(Biomarker::measurement(name, "weight", weight))?;
            study.add_participant(participant);
        }
        Ok(study)
    }

    fn all_weights() -> PathExpr {
        PathExpr::new().any().any().key("weight").any().select("value")
    }

    #[test]
    fn test_queried_weight_mean_is_75() -> Result<()> {
        let study = cohort()?;
        let stats = StudyStats::new(&study);

        assert_eq!(stats.mean(&all_weights())?, Some(75.0));
        Ok(())
    }

    #[test]
    fn test_facade_matches_free_functions() -> Result<()> {
        let study = cohort()?;
        let stats = StudyStats::new(&study);
        let values = stats.values(&all_weights())?;

        assert_eq!(values, vec![70.0, 80.0]);
        assert_eq!(stats.median(&all_weights())?, stats::median(&values));
        assert_eq!(stats.std_dev(&all_weights())?, stats::std_dev(&values));
        assert_eq!(
            stats.confidence_interval(&all_weights(), CI_LOW, CI_HIGH)?,
            stats::confidence_interval(&values, CI_LOW, CI_HIGH)
        );
        Ok(())
    }

    #[test]
    fn test_statistics_ignore_undefined_entries() {
        let gappy = [7.2, f64::NAN, 6.8, f64::NAN, 7.9];
        let clean = [7.2, 6.8, 7.9];

        assert_eq!(stats::mean(&gappy), stats::mean(&clean));
        assert_eq!(stats::median(&gappy), stats::median(&clean));
        assert_eq!(stats::std_dev(&gappy), stats::std_dev(&clean));
        assert_eq!(
            stats::confidence_interval(&gappy, CI_LOW, CI_HIGH),
            stats::confidence_interval(&clean, CI_LOW, CI_HIGH)
        );
    }

    #[test]
    fn test_category_counts_and_mode_over_arms() -> Result<()> {
        let mut study = Study::new("S");
        for (name, arm_code) in [("P1", 1.0), ("P2", 1.0), ("P3", 2.0)] {
            let mut participant = Participant::new(name);
            participant.add_measurement(Biomarker::measurement(name, "arm_code", arm_code))?;
            study.add_participant(participant);
        }

        let expr = PathExpr::new().any().any().key("arm_code").any().select("value");
        let stats = StudyStats::new(&study);

        assert_eq!(stats.category_counts(&expr)?, vec![(1.0, 2), (2.0, 1)]);
        assert_eq!(stats.mode(&expr)?, Some((1.0, 2)));
        assert_eq!(stats.gap_fraction(&expr)?, (vec![1.0, 2.0], vec![2, 1]));
        Ok(())
    }
}
