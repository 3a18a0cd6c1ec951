//! Integration tests for the resume tailor

use resume_tailor::input::InputManager;
use resume_tailor::llm::tailor::{fallback_tailoring, SectionSet};
use resume_tailor::output::docx::{AcceptedChanges, ExportRequest, ResumeDraft, DOCX_MIME_TYPE, EXPORT_FILENAME};
use resume_tailor::processing::job_analyzer::ExperienceLevel;
use resume_tailor::processing::sections::{ResumeSections, SectionContent};
use resume_tailor::{ResumeService, ResumeTailorError, Upload};
use std::path::Path;

const RESUME_FIXTURE: &str = "tests/fixtures/sample_resume.txt";
const JOB_FIXTURE: &str = "tests/fixtures/sample_job.txt";

async fn fixture(path: &str) -> String {
    InputManager::new().extract_text(Path::new(path)).await.unwrap()
}

async fn exported_text(service: &ResumeService, request: &ExportRequest) -> String {
    let document = service.export_resume(request).unwrap();
    resume_tailor::input::text_extractor::docx_text_from_bytes(&document.bytes).unwrap()
}

#[tokio::test]
async fn test_parse_pasted_resume() {
    let service = ResumeService::new(None);
    let parsed = service.parse_resume(Some(fixture(RESUME_FIXTURE).await), None).await.unwrap();
    let sections = &parsed.sections;

    assert_eq!(parsed.filename, None);
    assert_eq!(sections.contact.name, "Jane Roe");
    assert_eq!(sections.contact.email.as_deref(), Some("jane.roe@example.com"));
    assert_eq!(sections.contact.phone.as_deref(), Some("(555) 123-4567"));
    assert_eq!(sections.contact.linkedin.as_deref(), Some("linkedin.com/in/jane-roe"));

    assert_eq!(
        sections.summary.content,
        "Summary\nBackend engineer with 6 years building Python and Rust services."
    );
    assert_eq!(
        sections.experience.bullets,
        vec![
            "Built payment APIs serving 2M requests per day",
            "Led migration from monolith to microservices on Kubernetes",
            "Reduced cloud spend by 30% through autoscaling",
            "Mentored four junior engineers",
        ]
    );
    assert_eq!(sections.skills.content, "Skills\nPython, Rust, SQL, Docker, Kubernetes, AWS");
    assert_eq!(sections.education.content, "Education\nB.S. Computer Science, State University");
    assert_eq!(sections.certifications.content, "Certifications\nAWS Certified Solutions Architect");
    assert_eq!(sections.projects.bullets, vec!["Open source contributor to a Rust HTTP library"]);
}

#[tokio::test]
async fn test_parsed_resume_always_has_seven_keys() {
    let service = ResumeService::new(None);

    for text in ["just a name", "Jane Roe\nSkills\nRust", "\u{00e9}t\u{00e9} \u{2022} r\u{00e9}sum\u{00e9}"] {
        let parsed = service.parse_resume(Some(text.to_string()), None).await.unwrap();
        let value = serde_json::to_value(&parsed.sections).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 7);
        for key in ["contact", "summary", "experience", "education", "skills", "certifications", "projects"] {
            assert!(object.contains_key(key), "missing {} for {:?}", key, text);
        }
    }
}

#[tokio::test]
async fn test_parse_markdown_resume() {
    let text = fixture("tests/fixtures/sample_resume.md").await;
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));

    let parsed = ResumeService::new(None).parse_resume(Some(text), None).await.unwrap();
    assert_eq!(parsed.sections.contact.name, "Jane Roe");
    assert_eq!(
        parsed.sections.experience.bullets,
        vec![
            "Built payment APIs serving 2M requests per day",
            "Led migration from monolith to microservices",
        ]
    );
    assert_eq!(parsed.sections.skills.content, "Skills\nPython, Rust, SQL, Docker");
}

#[tokio::test]
async fn test_parse_uploaded_docx() {
    let service = ResumeService::new(None);
    let original = service.parse_resume(Some(fixture(RESUME_FIXTURE).await), None).await.unwrap();
    let document = service
        .export_resume(&ExportRequest {
            original_sections: ResumeDraft::from_sections(&original.sections),
            tailored_sections: SectionSet::from_sections(&original.sections),
            accepted_changes: AcceptedChanges::default(),
        })
        .unwrap();

    let parsed = service
        .parse_resume(None, Some(Upload::new("jane.docx", document.bytes)))
        .await
        .unwrap();

    assert_eq!(parsed.filename.as_deref(), Some("jane.docx"));
    assert_eq!(parsed.sections.contact.name, "Jane Roe");
    assert_eq!(parsed.sections.contact.email.as_deref(), Some("jane.roe@example.com"));
    assert!(parsed.sections.skills.content.contains("Python, Rust, SQL, Docker, Kubernetes, AWS"));
}

#[tokio::test]
async fn test_upload_rejects_unsupported_format() {
    let bytes = std::fs::read("tests/fixtures/unsupported.xyz").unwrap();
    let result = ResumeService::new(None)
        .parse_resume(None, Some(Upload::new("unsupported.xyz", bytes)))
        .await;

    assert!(matches!(result, Err(ResumeTailorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_upload_rejects_corrupt_docx() {
    let result = ResumeService::new(None)
        .parse_resume(None, Some(Upload::new("broken.docx", b"not a zip archive".to_vec())))
        .await;

    assert!(matches!(result, Err(ResumeTailorError::DocumentExtraction(_))));
}

#[tokio::test]
async fn test_missing_file_and_text() {
    let result = ResumeService::new(None).parse_resume(None, None).await;
    assert!(matches!(result, Err(ResumeTailorError::MissingInput)));
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let result = InputManager::new().extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(ResumeTailorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let result = InputManager::new().extract_text(Path::new("tests/fixtures/missing.txt")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_analyze_job_fixture() {
    let analysis = ResumeService::new(None).analyze_job(&fixture(JOB_FIXTURE).await);

    assert_eq!(analysis.experience_level, ExperienceLevel::Senior);
    assert_eq!(analysis.keywords[0], "python");
    assert!(analysis.keywords.len() <= 30);
    assert_eq!(analysis.required_skills, vec!["python", "sql", "docker", "kubernetes", "terraform"]);
    assert_eq!(analysis.preferred_skills, vec!["terraform"]);
    assert_eq!(analysis.key_responsibilities.len(), 8);
    assert_eq!(analysis.key_responsibilities[0], "Design and build scalable Python APIs");

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["experience_level"], "Senior");
}

#[tokio::test]
async fn test_senior_cue_wins_over_year_range() {
    let service = ResumeService::new(None);

    let analysis = service.analyze_job("Senior engineer, 3-5 years of Go");
    assert_eq!(analysis.experience_level, ExperienceLevel::Senior);

    let analysis = service.analyze_job("We want 10 years with databases");
    assert_eq!(analysis.experience_level, ExperienceLevel::Senior);

    let analysis = service.analyze_job("Great team, great benefits");
    assert_eq!(analysis.experience_level, ExperienceLevel::NotSpecified);
}

#[tokio::test]
async fn test_tailor_without_credential_degrades() {
    let service = ResumeService::new(None);
    let resume = fixture(RESUME_FIXTURE).await;
    let outcome = service.tailor_resume(&resume, &fixture(JOB_FIXTURE).await).await;

    assert!(outcome.is_degraded());
    let result = outcome.result();
    let parsed = service.parse_resume(Some(resume), None).await.unwrap();

    assert_eq!(result.original.summary, parsed.sections.summary.content);
    assert_eq!(result.original.experience, parsed.sections.experience.bullets);
    assert_eq!(result.tailored.experience.len(), 4);
    assert!(result.tailored.experience.iter().all(|bullet| bullet.starts_with("✓ ")));
    assert_eq!(result.tailored.skills, result.original.skills);
}

#[test]
fn test_fallback_appends_marker_to_summary() {
    let sections = ResumeSections {
        summary: SectionContent {
            content: "Built features.".to_string(),
            bullets: vec![],
        },
        experience: SectionContent {
            content: String::new(),
            bullets: (1..=7).map(|i| format!("Bullet {}", i)).collect(),
        },
        ..Default::default()
    };

    let result = fallback_tailoring(&sections);

    assert_eq!(result.tailored.summary, "Built features. (ATS-optimized)");
    assert_eq!(result.original.experience.len(), 7);
    assert_eq!(result.tailored.experience, vec!["✓ Bullet 1", "✓ Bullet 2", "✓ Bullet 3", "✓ Bullet 4", "✓ Bullet 5"]);
}

#[tokio::test]
async fn test_export_omits_empty_summary() {
    let service = ResumeService::new(None);
    let parsed = service
        .parse_resume(Some("Jane Roe\n\nSkills\nRust, SQL".to_string()), None)
        .await
        .unwrap();

    let request = ExportRequest {
        original_sections: ResumeDraft::from_sections(&parsed.sections),
        tailored_sections: SectionSet::default(),
        accepted_changes: AcceptedChanges::default(),
    };
    let text = exported_text(&service, &request).await;

    assert!(!text.contains("PROFESSIONAL SUMMARY"));
    assert!(!text.contains("PROFESSIONAL EXPERIENCE"));
    assert!(text.contains("SKILLS\n"));
    assert!(text.contains("Rust, SQL"));
}

#[tokio::test]
async fn test_export_without_accepted_changes_keeps_original_text() {
    let service = ResumeService::new(None);
    let parsed = service.parse_resume(Some(fixture(RESUME_FIXTURE).await), None).await.unwrap();

    let mut request = ExportRequest {
        original_sections: ResumeDraft::from_sections(&parsed.sections),
        tailored_sections: SectionSet {
            summary: "TAILORED summary".to_string(),
            experience: vec!["TAILORED bullet".to_string()],
            skills: "TAILORED skills".to_string(),
        },
        accepted_changes: AcceptedChanges::default(),
    };

    let text = exported_text(&service, &request).await;
    assert!(!text.contains("TAILORED"));
    assert!(text.contains("Backend engineer with 6 years building Python and Rust services."));
    assert!(text.contains("Mentored four junior engineers"));
    assert!(text.contains("Python, Rust, SQL, Docker, Kubernetes, AWS"));
    assert!(text.contains("B.S. Computer Science, State University"));
    assert!(text.contains("AWS Certified Solutions Architect"));

    request.accepted_changes.experience = true;
    let text = exported_text(&service, &request).await;
    assert!(text.contains("TAILORED bullet"));
    assert!(!text.contains("Mentored four junior engineers"));
    assert!(!text.contains("TAILORED summary"));
}

#[tokio::test]
async fn test_export_request_json_shape() {
    let json = r#"{
        "original_sections": {
            "contact": {"name": "Jane Roe", "email": "jane@example.com"},
            "summary": "Backend engineer.",
            "experience": ["Built APIs"],
            "skills": "Rust",
            "education": "B.S. Computer Science"
        },
        "tailored_sections": {"summary": "Rust backend engineer.", "experience": [], "skills": "Rust, SQL"},
        "accepted_changes": {"summary": true}
    }"#;

    let request: ExportRequest = serde_json::from_str(json).unwrap();
    assert!(request.accepted_changes.summary);
    assert!(!request.accepted_changes.skills);

    let service = ResumeService::new(None);
    let document = service.export_resume(&request).unwrap();
    assert_eq!(document.filename, EXPORT_FILENAME);
    assert_eq!(document.mime_type, DOCX_MIME_TYPE);

    let text = exported_text(&service, &request).await;
    assert!(text.contains("Rust backend engineer."));
    assert!(!text.contains("Backend engineer."));
    assert!(text.contains("jane@example.com"));
    assert!(text.contains("B.S. Computer Science"));
}
