use std::sync::Arc;

use chrono::NaiveDate;
use placement::engine::{
    Category, PlacementEngine, RawScores, SchoolDirectory, ScorePolicy, ScoreValidationError,
    ThresholdPreset, NO_PLACEMENT,
};
use placement::records::{
    generate_alerts, AlertKind, AlertSeverity, Gender, InMemoryStudentRepository,
    PlacementService, PlacementServiceError, Student, StudentId, StudentProfile, TestHeader,
    TestId,
};
use placement::report::{ClassReport, ReportLimits};

const SUBJECTS: [&str; 6] = ["ENG", "MATH", "SCI", "SOC", "RME", "FRN"];

/// Every subject at the same raw score, so the aggregate is six times one grade.
fn uniform(score: i32) -> RawScores {
    SUBJECTS.iter().map(|code| (*code, score)).collect()
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

fn header(mock: &str, month: u32) -> TestHeader {
    TestHeader::new(mock, &format!("{mock} Assessment"), date(month, 10))
}

fn profile(name: &str, index_number: &str, gender: Gender) -> StudentProfile {
    StudentProfile {
        name: name.to_string(),
        index_number: index_number.to_string(),
        class_name: "JHS 3A".to_string(),
        gender,
        date_of_birth: None,
        parent_contact: None,
    }
}

fn service_with(
    repository: Arc<InMemoryStudentRepository>,
    preset: ThresholdPreset,
    policy: ScorePolicy,
) -> PlacementService<InMemoryStudentRepository> {
    PlacementService::new(
        repository,
        Arc::new(PlacementEngine::with_preset(preset)),
        Arc::new(SchoolDirectory::ghana_sample()),
        policy,
    )
}

fn service() -> PlacementService<InMemoryStudentRepository> {
    service_with(
        Arc::new(InMemoryStudentRepository::default()),
        ThresholdPreset::Bece,
        ScorePolicy::Clamp,
    )
}

fn register(
    service: &PlacementService<InMemoryStudentRepository>,
    name: &str,
    index: &str,
    gender: Gender,
) -> Student {
    service
        .register_student(profile(name, index, gender))
        .expect("student registers")
}

#[test]
fn recorded_test_freezes_grading_and_placement() {
    let service = service();
    let ama = register(&service, "Ama Mensah", "0101001", Gender::Female);

    let test = service
        .record_test(&ama.id, header("Mock 1", 1), uniform(92))
        .expect("test recorded");
    assert_eq!(test.id, TestId("MT000001".to_string()));
    assert_eq!(test.aggregate(), 6);
    assert_eq!(test.category(), Category::TopTier);
    assert_eq!(test.predicted_school(), "Achimota School");
    assert_eq!(test.predicted_program(), "Science");

    let stored = service.get(&ama.id).expect("student stored");
    assert_eq!(stored.mock_tests, vec![test]);
}

#[test]
fn registration_rejects_bad_profiles_and_duplicates() {
    let service = service();
    let error = service
        .register_student(profile("A", "012", Gender::Male))
        .expect_err("short name and index");
    match error {
        PlacementServiceError::InvalidProfile { problems } => assert_eq!(problems.len(), 2),
        other => panic!("expected invalid profile, got {other:?}"),
    }

    register(&service, "Kofi Boateng", "0101002", Gender::Male);
    let error = service
        .register_student(profile("Kwame Boateng", " 0101002 ", Gender::Male))
        .expect_err("duplicate index number");
    assert!(matches!(
        error,
        PlacementServiceError::DuplicateIndexNumber(ref index) if index == "0101002"
    ));
}

#[test]
fn recording_by_unknown_index_number_fails() {
    let service = service();
    let error = service
        .record_test_by_index("9999999", header("Mock 1", 1), uniform(70))
        .expect_err("unknown index");
    assert!(matches!(error, PlacementServiceError::UnknownIndexNumber(_)));
}

#[test]
fn score_policy_controls_out_of_range_input() {
    let clamp = service();
    let ama = register(&clamp, "Ama Mensah", "0101001", Gender::Female);
    let mut scores = uniform(80);
    scores.insert("ENG", 105);
    let test = clamp
        .record_test(&ama.id, header("Mock 1", 1), scores.clone())
        .expect("clamped scores accepted");
    assert_eq!(test.scores().get("ENG"), Some(100));

    let reject = service_with(
        Arc::new(InMemoryStudentRepository::default()),
        ThresholdPreset::Bece,
        ScorePolicy::Reject,
    );
    let kofi = register(&reject, "Kofi Boateng", "0101002", Gender::Male);
    let error = reject
        .record_test(&kofi.id, header("Mock 1", 1), scores)
        .expect_err("out of range rejected");
    assert!(matches!(
        error,
        PlacementServiceError::Scores(ScoreValidationError::OutOfRange { score: 105, .. })
    ));
    assert!(reject
        .get(&kofi.id)
        .expect("student stored")
        .mock_tests
        .is_empty());
}

#[test]
fn rejected_scores_do_not_register_a_new_index_number() {
    let service = service_with(
        Arc::new(InMemoryStudentRepository::default()),
        ThresholdPreset::Bece,
        ScorePolicy::Reject,
    );
    let mut scores = uniform(70);
    scores.insert("ENG", 150);

    let error = service
        .record_test_or_register(
            profile("Yaw Asante", "0101009", Gender::Male),
            header("Mock 1", 1),
            scores,
        )
        .expect_err("out of range rejected");
    assert!(matches!(
        error,
        PlacementServiceError::Scores(ScoreValidationError::OutOfRange { score: 150, .. })
    ));
    assert!(service.students().expect("students listed").is_empty());

    let test = service
        .record_test_or_register(
            profile("Yaw Asante", "0101009", Gender::Male),
            header("Mock 1", 1),
            uniform(70),
        )
        .expect("valid scores register and record");
    let again = service
        .record_test_or_register(
            profile("Someone Else", "0101009", Gender::Female),
            header("Mock 2", 3),
            uniform(85),
        )
        .expect("known index number records");

    let students = service.students().expect("students listed");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].profile.name, "Yaw Asante");
    assert_eq!(students[0].mock_tests, vec![test, again]);
}

#[test]
fn rescoring_regrades_in_the_same_step() {
    let service = service();
    let ama = register(&service, "Ama Mensah", "0101001", Gender::Female);
    let test = service
        .record_test(&ama.id, header("Mock 1", 1), uniform(75))
        .expect("test recorded");
    assert_eq!(test.category(), Category::Standard);

    let rescored = service
        .rescore_test(&ama.id, &test.id, uniform(92))
        .expect("rescored");
    assert_eq!(rescored.id, test.id);
    assert_eq!(rescored.aggregate(), 6);
    assert_eq!(rescored.predicted_school(), "Achimota School");

    let error = service
        .rescore_test(&ama.id, &TestId("MT999999".to_string()), uniform(50))
        .expect_err("unknown test");
    assert!(matches!(error, PlacementServiceError::UnknownTest(_)));

    let error = service
        .rescore_test(&StudentId("stu-999999".to_string()), &test.id, uniform(50))
        .expect_err("unknown student");
    assert!(matches!(error, PlacementServiceError::Repository(_)));
}

#[test]
fn reconcile_regrades_tests_recorded_under_other_thresholds() {
    let repository = Arc::new(InMemoryStudentRepository::default());
    let legacy = service_with(repository.clone(), ThresholdPreset::Legacy, ScorePolicy::Clamp);
    let ama = register(&legacy, "Ama Mensah", "0101001", Gender::Female);
    let old = legacy
        .record_test(&ama.id, header("Mock 1", 1), uniform(65))
        .expect("test recorded");
    assert_eq!(old.category(), Category::Standard);
    assert_eq!(old.predicted_school(), "St. Monica's Senior High School");

    let current = service_with(repository, ThresholdPreset::Bece, ScorePolicy::Clamp);
    let stored = current.get(&ama.id).expect("student stored");
    assert!(stored.mock_tests[0].is_stale(current.engine(), current.directory()));

    assert_eq!(current.reconcile(&ama.id).expect("reconciled"), 1);
    let refreshed = current.get(&ama.id).expect("student stored");
    let test = &refreshed.mock_tests[0];
    assert_eq!(test.aggregate(), 24);
    assert_eq!(test.category(), Category::CommunityDay);
    assert_eq!(test.predicted_school(), NO_PLACEMENT);

    assert_eq!(current.reconcile(&ama.id).expect("second pass"), 0);
}

/// Four students: an improver, a decliner, a single-test student, and a
/// steady top scorer.
fn seeded_class() -> Vec<Student> {
    let service = service();
    let ama = register(&service, "Ama Mensah", "0101001", Gender::Female);
    let efua = register(&service, "Efua Asante", "0101002", Gender::Female);
    let kofi = register(&service, "Kofi Boateng", "0101003", Gender::Male);
    let yaw = register(&service, "Yaw Darko", "0101004", Gender::Unspecified);

    let record = |id: &StudentId, mock: &str, month: u32, score: i32| {
        service
            .record_test(id, header(mock, month), uniform(score))
            .expect("test recorded");
    };
    // Recorded out of date order on purpose; alerts follow test dates.
    record(&ama.id, "Mock 2", 3, 85);
    record(&ama.id, "Mock 1", 1, 55);
    record(&efua.id, "Mock 1", 1, 85);
    record(&efua.id, "Mock 2", 3, 55);
    record(&kofi.id, "Mock 1", 1, 92);
    record(&yaw.id, "Mock 1", 1, 92);
    record(&yaw.id, "Mock 2", 3, 93);

    service.students().expect("students listed")
}

#[test]
fn alerts_compare_the_two_most_recent_tests() {
    let students = seeded_class();
    let alerts = generate_alerts(&students);

    let summary: Vec<(&str, AlertKind)> = alerts
        .iter()
        .map(|alert| (alert.student_name.as_str(), alert.kind))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Ama Mensah", AlertKind::Improvement),
            ("Efua Asante", AlertKind::Decline),
            ("Efua Asante", AlertKind::AtRisk),
            ("Yaw Darko", AlertKind::Excellent),
        ]
    );

    let improvement = &alerts[0];
    assert_eq!(improvement.severity, AlertSeverity::Positive);
    assert_eq!(improvement.previous_aggregate, Some(30));
    assert_eq!(improvement.current_aggregate, 12);
    assert_eq!(improvement.id, "stu-000001-improvement");
    assert!(improvement.message.contains("18 points"));

    let at_risk = &alerts[2];
    assert_eq!(at_risk.severity, AlertSeverity::Critical);
    assert_eq!(at_risk.previous_aggregate, None);
}

#[test]
fn class_report_summarises_latest_tests() {
    let students = seeded_class();
    let report = ClassReport::build(
        &students,
        PlacementEngine::default().catalog(),
        ReportLimits::default(),
    );

    assert_eq!(report.total_students, 4);
    assert_eq!(report.students_with_tests, 4);
    assert_eq!(report.average_aggregate, Some(13.5));

    let top: Vec<&str> = report
        .top_performers
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(top, vec!["Kofi Boateng", "Yaw Darko", "Ama Mensah", "Efua Asante"]);

    assert_eq!(report.category_count(Category::TopTier), 2);
    assert_eq!(report.category_count(Category::Good), 1);
    assert_eq!(report.category_count(Category::Standard), 0);
    assert_eq!(report.category_count(Category::CommunityDay), 1);

    let genders: Vec<usize> = report
        .gender_distribution
        .iter()
        .map(|entry| entry.students)
        .collect();
    assert_eq!(genders, vec![1, 2, 1]);

    let rate = report.improvement_rate_pct.expect("repeat takers present");
    assert!((rate - 100.0 / 3.0).abs() < 0.01);

    let english = report
        .subject_averages
        .iter()
        .find(|entry| entry.code == "ENG")
        .expect("english average");
    assert_eq!(english.average_score, 81.25);
    assert_eq!(report.subject_averages.len(), SUBJECTS.len());

    let schools: Vec<(&str, usize)> = report
        .predicted_schools
        .iter()
        .map(|entry| (entry.school.as_str(), entry.students))
        .collect();
    assert_eq!(
        schools,
        vec![
            ("Achimota School", 2),
            ("Ghana National College", 1),
            (NO_PLACEMENT, 1),
        ]
    );

    let trend: Vec<i64> = report
        .improvement_trend
        .iter()
        .map(|entry| entry.improvement)
        .collect();
    assert_eq!(trend, vec![18, 0, -18]);
}

#[test]
fn class_report_of_empty_class_has_no_averages() {
    let report = ClassReport::build(
        &[],
        PlacementEngine::default().catalog(),
        ReportLimits::default(),
    );
    assert_eq!(report.total_students, 0);
    assert!(report.average_aggregate.is_none());
    assert!(report.improvement_rate_pct.is_none());
    assert!(report.subject_averages.is_empty());
    assert_eq!(report.category_distribution.len(), 4);
}
