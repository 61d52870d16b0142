#[cfg(test)]
mod tests {
    use anyhow::Result;
    use biostudy::query::{eq, gt, lt};
    use biostudy::{Biomarker, Participant, PathExpr, Predicate, Study, StudyError};
    use chrono::NaiveDate;
    use serde_json::json;

    fn cohort() -> Result<Study> {
        let time = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut study = Study::new("S");
        for (name, arm, weight) in [
            ("P1", "treatment", 70.0),
            ("P2", "control", 80.0),
            ("P3", "treatment", 92.5),
        ] {
            let mut participant = Participant::new(name);
            participant.add_measurement(Biomarker::new(
                name,
                "weight",
                weight,
                Some(time),
                None,
                Some(arm.to_string()),
                None,
                None,
            )?)?;
            study.add_participant(participant);
        }
        Ok(study)
    }

    #[test]
    fn test_predicate_filters_records_by_arm() -> Result<()> {
        let study = cohort()?;
        let expr = PathExpr::new()
            .any()
            .any()
            .key("weight")
            .any()
            .filter(eq("arm", "treatment"))
            .select("value");

        assert_eq!(study.query(&expr)?, vec![json!(70.0), json!(92.5)]);
        Ok(())
    }

    #[test]
    fn test_combined_predicates() -> Result<()> {
        let study = cohort()?;
        let expr = PathExpr::new()
            .any()
            .any()
            .key("weight")
            .any()
            .filter(Predicate::And(vec![gt("value", 75.0), lt("value", 90.0)]))
            .select("participant");

        assert_eq!(study.query(&expr)?, vec![json!("P2")]);
        Ok(())
    }

    #[test]
    fn test_querying_an_absent_biomarker_matches_nothing() -> Result<()> {
        let study = cohort()?;
        let expr = PathExpr::new().any().any().key("HbA1c").any();

        assert!(study.query(&expr)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_query_propagates_the_engine_error() -> Result<()> {
        let study = cohort()?;
        // descends into the scalar "value" field of each record
        let expr = PathExpr::new()
            .any()
            .any()
            .key("weight")
            .any()
            .key("value")
            .key("deeper");

        let result = study.query(&expr);
        assert!(matches!(result, Err(StudyError::Query(_))));
        Ok(())
    }

    #[test]
    fn test_index_selects_one_element() -> Result<()> {
        let study = cohort()?;
        // each participant entry is a singleton sequence
        let expr = PathExpr::new()
            .key("P2")
            .index(0)
            .values("weight")
            .select("value");

        assert_eq!(study.query(&expr)?, vec![json!(80.0)]);
        Ok(())
    }
}
