mod common;

use anyhow::Result;
use axum::http::StatusCode;

use campus_api::middleware::Actor;
use campus_api::models::LessonCell;
use campus_api::store::MemoryStore;
use campus_api::types::Role;
use campus_api::workflows::lesson_plans::{
    self, CreatePlanInput, HeadInput, PageQuery, UpdatePlanInput,
};
use uuid::Uuid;

fn times() -> Vec<String> {
    (0..5).map(|i| format!("{:02}:00", 9 + i)).collect()
}

fn cells(text: &str) -> Vec<LessonCell> {
    (0..10)
        .map(|i| LessonCell {
            text: format!("{} {}", text, i),
        })
        .collect()
}

fn plan_input(title: &str) -> CreatePlanInput {
    CreatePlanInput {
        head: HeadInput {
            banner_title: title.into(),
            program_name: "Weekend Program".into(),
            week_label: "Week 1".into(),
        },
        times_sat: times(),
        times_sun: times(),
        cells: cells("Topic"),
    }
}

fn teacher_actor() -> Actor {
    Actor {
        account: Uuid::new_v4(),
        role: Role::Teacher,
        campus: None,
    }
}

#[tokio::test]
async fn the_grid_shape_is_enforced() -> Result<()> {
    let store = MemoryStore::new();
    let actor = teacher_actor();

    let mut input = plan_input("Bad Times");
    input.times_sat.pop();
    let err = lesson_plans::create(&store, &actor, input)
        .await
        .expect_err("4 slots");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let mut input = plan_input("Bad Cells");
    input.cells.truncate(7);
    let err = lesson_plans::create(&store, &actor, input)
        .await
        .expect_err("7 cells");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn plans_are_scoped_to_their_creator() -> Result<()> {
    let store = MemoryStore::new();
    let author = teacher_actor();
    let peer = teacher_actor();

    let plan = lesson_plans::create(&store, &author, plan_input("Mine"))
        .await
        .expect("create");

    let err = lesson_plans::get(&store, &peer, plan.id)
        .await
        .expect_err("someone else's plan");
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

    let page = lesson_plans::list(&store, &peer, PageQuery { page: None, limit: None })
        .await
        .expect("list");
    assert_eq!(page.total, 0);
    Ok(())
}

#[tokio::test]
async fn soft_deleted_plans_disappear_everywhere() -> Result<()> {
    let store = MemoryStore::new();
    let actor = teacher_actor();
    let plan = lesson_plans::create(&store, &actor, plan_input("Gone Soon"))
        .await
        .expect("create");

    lesson_plans::soft_delete(&store, &actor, plan.id)
        .await
        .expect("delete");

    let err = lesson_plans::get(&store, &actor, plan.id)
        .await
        .expect_err("hidden");
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

    let page = lesson_plans::list(&store, &actor, PageQuery { page: None, limit: None })
        .await
        .expect("list");
    assert_eq!(page.total, 0);
    Ok(())
}

#[tokio::test]
async fn duplicating_appends_a_copy_suffix() -> Result<()> {
    let store = MemoryStore::new();
    let actor = teacher_actor();
    let plan = lesson_plans::create(&store, &actor, plan_input("Original"))
        .await
        .expect("create");

    let copy = lesson_plans::duplicate(&store, &actor, plan.id)
        .await
        .expect("duplicate");
    assert_ne!(copy.id, plan.id);
    assert_eq!(copy.head.banner_title, "Original (Copy)");
    assert_eq!(copy.cells, plan.cells);

    let page = lesson_plans::list(&store, &actor, PageQuery { page: None, limit: None })
        .await
        .expect("list");
    assert_eq!(page.total, 2);
    Ok(())
}

#[tokio::test]
async fn updates_revalidate_the_grid_and_bump_saved_at() -> Result<()> {
    let store = MemoryStore::new();
    let actor = teacher_actor();
    let plan = lesson_plans::create(&store, &actor, plan_input("Editable"))
        .await
        .expect("create");

    let err = lesson_plans::update(
        &store,
        &actor,
        plan.id,
        UpdatePlanInput {
            head: None,
            times_sat: Some(vec!["09:00".into()]),
            times_sun: None,
            cells: None,
        },
    )
    .await
    .expect_err("grid broken");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let updated = lesson_plans::update(
        &store,
        &actor,
        plan.id,
        UpdatePlanInput {
            head: Some(HeadInput {
                banner_title: "Renamed".into(),
                program_name: "Weekend Program".into(),
                week_label: "Week 2".into(),
            }),
            times_sat: None,
            times_sun: None,
            cells: None,
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.head.banner_title, "Renamed");
    assert!(updated.saved_at >= plan.saved_at);
    Ok(())
}

#[tokio::test]
async fn search_matches_cell_text_case_insensitively() -> Result<()> {
    let store = MemoryStore::new();
    let actor = teacher_actor();
    lesson_plans::create(&store, &actor, plan_input("Algebra Week"))
        .await
        .expect("create");
    let mut tagged = plan_input("Untitled");
    tagged.cells[3].text = "Photosynthesis basics".into();
    lesson_plans::create(&store, &actor, tagged).await.expect("create");

    let hits = lesson_plans::search(&store, &actor, "PHOTOSYNTHESIS")
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].head.banner_title, "Untitled");

    let err = lesson_plans::search(&store, &actor, "   ")
        .await
        .expect_err("blank query");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn listing_paginates_newest_saved_first() -> Result<()> {
    let store = MemoryStore::new();
    let actor = teacher_actor();
    for i in 0..7 {
        lesson_plans::create(&store, &actor, plan_input(&format!("Plan {}", i)))
            .await
            .expect("create");
    }

    let page = lesson_plans::list(
        &store,
        &actor,
        PageQuery {
            page: Some(2),
            limit: Some(3),
        },
    )
    .await
    .expect("page 2");
    assert_eq!(page.total, 7);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.count, 3);
    assert_eq!(page.page, 2);

    let last = lesson_plans::list(
        &store,
        &actor,
        PageQuery {
            page: Some(3),
            limit: Some(3),
        },
    )
    .await
    .expect("page 3");
    assert_eq!(last.count, 1);
    Ok(())
}
