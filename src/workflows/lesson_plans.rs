//! Weekend lesson plan grids. Plans are creator-scoped and soft-deleted:
//! `is_active = false` hides a plan everywhere, nothing is ever hard-deleted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::{LessonCell, LessonPlan, LessonPlanHead, TIME_SLOTS, TOPIC_CELLS};
use crate::store::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadInput {
    pub banner_title: String,
    pub program_name: String,
    pub week_label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanInput {
    pub head: HeadInput,
    pub times_sat: Vec<String>,
    pub times_sun: Vec<String>,
    pub cells: Vec<LessonCell>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanInput {
    pub head: Option<HeadInput>,
    pub times_sat: Option<Vec<String>>,
    pub times_sun: Option<Vec<String>>,
    pub cells: Option<Vec<LessonCell>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPage {
    pub count: usize,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub plans: Vec<LessonPlan>,
}

fn check_grid(times_sat: &[String], times_sun: &[String], cells: &[LessonCell]) -> Result<(), ApiError> {
    if times_sat.len() != TIME_SLOTS || times_sun.len() != TIME_SLOTS {
        return Err(ApiError::validation(format!(
            "exactly {} time slots are required for each day",
            TIME_SLOTS
        )));
    }
    if cells.len() != TOPIC_CELLS {
        return Err(ApiError::validation(format!(
            "exactly {} topic cells are required",
            TOPIC_CELLS
        )));
    }
    Ok(())
}

pub async fn create(
    store: &dyn Store,
    actor: &Actor,
    input: CreatePlanInput,
) -> Result<LessonPlan, ApiError> {
    check_grid(&input.times_sat, &input.times_sun, &input.cells)?;
    let now = Utc::now();
    let plan = LessonPlan {
        id: Uuid::new_v4(),
        created_by: actor.account,
        head: LessonPlanHead {
            banner_title: input.head.banner_title,
            program_name: input.head.program_name,
            week_label: input.head.week_label,
        },
        times_sat: input.times_sat,
        times_sun: input.times_sun,
        cells: input.cells,
        is_active: true,
        saved_at: now,
        created_at: now,
    };
    store.insert_lesson_plan(&plan).await?;
    Ok(plan)
}

/// Paginated list of the caller's active plans, newest saved first.
pub async fn list(store: &dyn Store, actor: &Actor, query: PageQuery) -> Result<PlanPage, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let plans: Vec<LessonPlan> = store
        .list_active_lesson_plans()
        .await?
        .into_iter()
        .filter(|p| p.created_by == actor.account)
        .collect();

    let total = plans.len();
    let total_pages = total.div_ceil(limit);
    let page_plans: Vec<LessonPlan> = plans
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect();

    Ok(PlanPage {
        count: page_plans.len(),
        total,
        page,
        limit,
        total_pages,
        plans: page_plans,
    })
}

/// Resolve an active plan; a plan belonging to someone else is out of scope,
/// an inactive one does not resolve at all.
async fn scoped_plan(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<LessonPlan, ApiError> {
    let plan = store
        .lesson_plan(id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| ApiError::not_found("lesson plan not found"))?;
    if plan.created_by != actor.account {
        return Err(ApiError::forbidden("this lesson plan belongs to someone else"));
    }
    Ok(plan)
}

pub async fn get(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<LessonPlan, ApiError> {
    scoped_plan(store, actor, id).await
}

pub async fn update(
    store: &dyn Store,
    actor: &Actor,
    id: Uuid,
    input: UpdatePlanInput,
) -> Result<LessonPlan, ApiError> {
    let mut plan = scoped_plan(store, actor, id).await?;
    if let Some(head) = input.head {
        plan.head = LessonPlanHead {
            banner_title: head.banner_title,
            program_name: head.program_name,
            week_label: head.week_label,
        };
    }
    if let Some(times_sat) = input.times_sat {
        plan.times_sat = times_sat;
    }
    if let Some(times_sun) = input.times_sun {
        plan.times_sun = times_sun;
    }
    if let Some(cells) = input.cells {
        plan.cells = cells;
    }
    check_grid(&plan.times_sat, &plan.times_sun, &plan.cells)?;
    plan.saved_at = Utc::now();
    store.update_lesson_plan(&plan).await?;
    Ok(plan)
}

pub async fn soft_delete(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<(), ApiError> {
    let mut plan = scoped_plan(store, actor, id).await?;
    plan.is_active = false;
    store.update_lesson_plan(&plan).await?;
    Ok(())
}

pub async fn duplicate(store: &dyn Store, actor: &Actor, id: Uuid) -> Result<LessonPlan, ApiError> {
    let source = scoped_plan(store, actor, id).await?;
    let now = Utc::now();
    let copy = LessonPlan {
        id: Uuid::new_v4(),
        created_by: actor.account,
        head: LessonPlanHead {
            banner_title: format!("{} (Copy)", source.head.banner_title),
            program_name: source.head.program_name,
            week_label: source.head.week_label,
        },
        times_sat: source.times_sat,
        times_sun: source.times_sun,
        cells: source.cells,
        is_active: true,
        saved_at: now,
        created_at: now,
    };
    store.insert_lesson_plan(&copy).await?;
    Ok(copy)
}

/// Case-insensitive search over the head fields and cell text, capped at 20
/// results.
pub async fn search(store: &dyn Store, actor: &Actor, q: &str) -> Result<Vec<LessonPlan>, ApiError> {
    let needle = q.trim().to_lowercase();
    if needle.is_empty() {
        return Err(ApiError::validation("search query is required"));
    }
    let matches: Vec<LessonPlan> = store
        .list_active_lesson_plans()
        .await?
        .into_iter()
        .filter(|p| p.created_by == actor.account)
        .filter(|p| {
            p.head.banner_title.to_lowercase().contains(&needle)
                || p.head.program_name.to_lowercase().contains(&needle)
                || p.head.week_label.to_lowercase().contains(&needle)
                || p.cells.iter().any(|c| c.text.to_lowercase().contains(&needle))
        })
        .take(20)
        .collect();
    Ok(matches)
}
