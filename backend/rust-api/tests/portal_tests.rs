use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{create_test_app, register_and_login, register_teacher_and_login, send_get, send_json};

fn course_payload(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Intro course",
        "lessons": [
            {
                "id": "lesson_1",
                "title": "First steps",
                "content": "Read this.",
                "questions": [
                    { "question": "Is water wet?", "options": ["A. Yes", "B. No"], "correct_answer": "A. Yes" },
                    { "question": "Is fire cold?", "options": ["A. Yes", "B. No"], "correct_answer": "B. No" }
                ]
            },
            {
                "id": "lesson_2",
                "title": "Next steps",
                "content": "Then this.",
                "questions": []
            }
        ]
    })
}

#[tokio::test]
async fn course_crud_with_ownership() {
    let app = create_test_app();
    let owner = register_teacher_and_login(&app, "owner_teacher").await;
    let rival = register_teacher_and_login(&app, "rival_teacher").await;
    let student = register_and_login(&app.router, "course_student").await;

    let (status, created) = send_json(
        &app.router,
        "POST",
        "/teacher/courses",
        Some(&owner),
        course_payload("Physics 101"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let course_id = created["course"]["id"].as_str().unwrap().to_string();

    // Duplicate title for the same teacher is rejected, regardless of case.
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/teacher/courses",
        Some(&owner),
        course_payload("Physics 101"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/teacher/courses",
        Some(&owner),
        course_payload("PHYSICS 101"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The listing carries the owner's name.
    let (status, listing) = send_get(&app.router, "/courses", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    let courses = listing["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["teacher_name"], json!("owner_teacher"));
    assert_eq!(courses[0]["lesson_count"], json!(2));

    // Another teacher cannot touch it.
    let uri = format!("/teacher/courses/{}", course_id);
    let (status, _) = send_json(
        &app.router,
        "PUT",
        &uri,
        Some(&rival),
        json!({ "title": "Hijacked" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner can.
    let (status, _) = send_json(
        &app.router,
        "PUT",
        &uri,
        Some(&owner),
        json!({ "title": "Physics 102" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, detail) = send_get(
        &app.router,
        &format!("/courses/{}", course_id),
        Some(&student),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["course"]["title"], json!("Physics 102"));
    assert_eq!(detail["is_owner"], json!(false));

    let (status, _) = send_json(&app.router, "DELETE", &uri, Some(&owner), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_get(
        &app.router,
        &format!("/courses/{}", course_id),
        Some(&student),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn documents_detect_link_types_and_filter() {
    let app = create_test_app();
    let teacher = register_teacher_and_login(&app, "doc_teacher").await;
    let student = register_and_login(&app.router, "doc_student").await;

    let (status, video) = send_json(
        &app.router,
        "POST",
        "/teacher/documents",
        Some(&teacher),
        json!({
            "title": "Orbit lecture",
            "url": "https://www.youtube.com/watch?v=abc123",
            "grade": "10",
            "doc_type": "lecture"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(video["document"]["link_type"], json!("youtube"));

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/teacher/documents",
        Some(&teacher),
        json!({
            "title": "Notes",
            "url": "https://example.com/notes.pdf",
            "grade": "11",
            "doc_type": "document"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, all) = send_get(&app.router, "/documents", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["documents"].as_array().unwrap().len(), 2);
    assert_eq!(all["documents_by_grade"]["10"].as_array().unwrap().len(), 1);

    let (status, filtered) = send_get(
        &app.router,
        "/documents?grade=11&doc_type=document",
        Some(&student),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered["documents"].as_array().unwrap().len(), 1);

    let (status, _) = send_get(&app.router, "/documents?grade=13", Some(&student)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lesson_progress_flows_to_the_teacher_overview() {
    let app = create_test_app();
    let teacher = register_teacher_and_login(&app, "progress_teacher").await;
    let student = register_and_login(&app.router, "progress_student").await;

    let (_, created) = send_json(
        &app.router,
        "POST",
        "/teacher/courses",
        Some(&teacher),
        course_payload("Chemistry"),
    )
    .await;
    let course_id = created["course"]["id"].as_str().unwrap().to_string();

    let (status, updated) = send_json(
        &app.router,
        "POST",
        "/progress",
        Some(&student),
        json!({ "course_id": course_id, "lesson_id": "lesson_1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed_lessons"], json!(["lesson_1"]));
    assert_eq!(updated["total_lessons"], json!(2));

    // Unknown lesson is rejected.
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/progress",
        Some(&student),
        json!({ "course_id": course_id, "lesson_id": "lesson_99" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, overview) = send_get(&app.router, "/teacher/progress", Some(&teacher)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = overview["progress"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["student_name"], json!("progress_student"));
    assert_eq!(rows[0]["completed"], json!(1));
    assert_eq!(rows[0]["total"], json!(2));
    assert_eq!(rows[0]["percentage"], json!(50.0));
}

#[tokio::test]
async fn exercises_grade_on_the_percent_scale() {
    let app = create_test_app();
    let teacher = register_teacher_and_login(&app, "exercise_teacher").await;
    let student = register_and_login(&app.router, "exercise_student").await;

    let (_, created) = send_json(
        &app.router,
        "POST",
        "/teacher/courses",
        Some(&teacher),
        course_payload("Biology"),
    )
    .await;
    let course_id = created["course"]["id"].as_str().unwrap().to_string();

    // Only the lesson with questions is listed as an exercise.
    let (status, listing) = send_get(&app.router, "/exercises", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    let exercises = listing["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["lesson_id"], json!("lesson_1"));
    assert!(exercises[0]["questions"][0].get("correct_answer").is_none());

    // One of two correct: 50.0 on the percent scale.
    let (status, graded) = send_json(
        &app.router,
        "POST",
        "/exercises/submit",
        Some(&student),
        json!({
            "course_id": course_id,
            "lesson_id": "lesson_1",
            "answers": { "0": "A. Yes", "1": "A. Yes" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(graded["score"], json!(50.0));
    assert_eq!(graded["correct"], json!(1));
    assert_eq!(graded["total"], json!(2));

    // The teacher sees the stored submission.
    let (status, submissions) = send_get(&app.router, "/teacher/submissions", Some(&teacher)).await;
    assert_eq!(status, StatusCode::OK);
    let stored = submissions["submissions"].as_array().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["exercise_id"], json!("lesson_1"));
}

#[tokio::test]
async fn chat_degrades_gracefully_without_a_backend() {
    let app = create_test_app();
    let student = register_and_login(&app.router, "chat_student").await;

    // No API key configured: the proxy answers with its fallback text
    // instead of an error status.
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/chat",
        Some(&student),
        json!({ "message": "What is osmosis?" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["response"].as_str().unwrap().contains("unavailable"));

    let (status, empty) = send_json(
        &app.router,
        "POST",
        "/api/chat",
        Some(&student),
        json!({ "message": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["success"], json!(false));
}
