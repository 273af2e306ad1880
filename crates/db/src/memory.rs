//! In-process [`DataSource`] backed by hash maps behind a `tokio` RwLock.
//!
//! Every write takes the lock once, so checks and updates (slug uniqueness,
//! the completion idempotency key, the pending guard on grading) are atomic
//! with respect to concurrent requests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use mambo_core::curriculum::ensure_order_index_free;
use mambo_core::error::CoreError;
use mambo_core::grading::{Submission, SubmissionStatus};
use mambo_core::leveling::LevelCurve;
use mambo_core::progression::{CompletionKey, LessonCompletion};
use mambo_core::streak::next_streak;
use mambo_core::types::{EntityId, Timestamp};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::course::{CreateLesson, CreateWorld, Lesson, UpdateWorld, World};
use crate::models::learner::{CompletionRecord, LearnerProfile};
use crate::models::stats::AdminStats;
use crate::models::submission::CreateSubmission;
use crate::source::DataSource;

#[derive(Debug, Default)]
struct Inner {
    worlds: HashMap<EntityId, World>,
    lessons: HashMap<EntityId, Lesson>,
    learners: HashMap<EntityId, LearnerProfile>,
    completions: HashMap<CompletionKey, Timestamp>,
    submissions: HashMap<EntityId, Submission>,
}

/// Hash-map backed store. Cheap to create; share it as an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a catalog.
    pub fn with_catalog(worlds: Vec<World>, lessons: Vec<Lesson>) -> Self {
        let inner = Inner {
            worlds: worlds.into_iter().map(|w| (w.id, w)).collect(),
            lessons: lessons.into_iter().map(|l| (l.id, l)).collect(),
            ..Inner::default()
        };
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Insert or replace a submission as-is, bypassing the submit rules.
    ///
    /// Used for imports and fixtures that need exact timestamps.
    pub async fn insert_submission(&self, submission: Submission) {
        let mut inner = self.inner.write().await;
        inner.submissions.insert(submission.id, submission);
    }
}

#[async_trait]
impl DataSource for MemoryStore {
    async fn list_worlds(&self) -> Result<Vec<World>, CoreError> {
        let inner = self.inner.read().await;
        let mut worlds: Vec<World> = inner.worlds.values().cloned().collect();
        worlds.sort_by_key(|w| w.order_index);
        Ok(worlds)
    }

    async fn get_world(&self, world_id: EntityId) -> Result<Option<World>, CoreError> {
        Ok(self.inner.read().await.worlds.get(&world_id).cloned())
    }

    async fn list_world_lessons(&self, world_id: EntityId) -> Result<Vec<Lesson>, CoreError> {
        let inner = self.inner.read().await;
        let mut lessons: Vec<Lesson> = inner
            .lessons
            .values()
            .filter(|l| l.world_id == world_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order_index);
        Ok(lessons)
    }

    async fn get_lesson(&self, lesson_id: EntityId) -> Result<Option<Lesson>, CoreError> {
        Ok(self.inner.read().await.lessons.get(&lesson_id).cloned())
    }

    async fn create_world(&self, input: &CreateWorld) -> Result<World, CoreError> {
        let mut inner = self.inner.write().await;

        if inner.worlds.values().any(|w| w.slug == input.slug) {
            return Err(CoreError::Conflict(format!(
                "A world with slug '{}' already exists",
                input.slug
            )));
        }

        let now = Utc::now();
        let world = World {
            id: Uuid::new_v4(),
            title: input.title.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            difficulty: input.difficulty,
            order_index: input.order_index,
            is_free: input.is_free,
            is_published: input.is_published,
            created_at: now,
            updated_at: now,
        };
        inner.worlds.insert(world.id, world.clone());

        tracing::debug!(world_id = %world.id, slug = %world.slug, "World stored");
        Ok(world)
    }

    async fn update_world(
        &self,
        world_id: EntityId,
        input: &UpdateWorld,
    ) -> Result<Option<World>, CoreError> {
        let mut inner = self.inner.write().await;
        let Some(world) = inner.worlds.get_mut(&world_id) else {
            return Ok(None);
        };

        if let Some(title) = &input.title {
            world.title = title.clone();
        }
        if let Some(description) = &input.description {
            world.description = description.clone();
        }
        if let Some(image_url) = &input.image_url {
            world.image_url = image_url.clone();
        }
        if let Some(difficulty) = input.difficulty {
            world.difficulty = difficulty;
        }
        if let Some(order_index) = input.order_index {
            world.order_index = order_index;
        }
        if let Some(is_free) = input.is_free {
            world.is_free = is_free;
        }
        if let Some(is_published) = input.is_published {
            world.is_published = is_published;
        }
        world.updated_at = Utc::now();

        Ok(Some(world.clone()))
    }

    async fn create_lesson(
        &self,
        world_id: EntityId,
        input: &CreateLesson,
    ) -> Result<Lesson, CoreError> {
        let mut inner = self.inner.write().await;

        if !inner.worlds.contains_key(&world_id) {
            return Err(CoreError::NotFound {
                entity: "World",
                id: world_id,
            });
        }

        ensure_order_index_free(
            inner
                .lessons
                .values()
                .filter(|l| l.world_id == world_id)
                .map(|l| l.order_index),
            input.order_index,
        )?;

        let lesson = Lesson {
            id: Uuid::new_v4(),
            world_id,
            title: input.title.clone(),
            description: input.description.clone(),
            video_url: input.video_url.clone(),
            xp_value: input.xp_value,
            order_index: input.order_index,
            is_boss_battle: input.is_boss_battle,
            duration_minutes: input.duration_minutes,
            created_at: Utc::now(),
        };
        inner.lessons.insert(lesson.id, lesson.clone());

        tracing::debug!(lesson_id = %lesson.id, world_id = %world_id, "Lesson stored");
        Ok(lesson)
    }

    async fn get_learner(&self, learner_id: EntityId) -> Result<LearnerProfile, CoreError> {
        if let Some(profile) = self.inner.read().await.learners.get(&learner_id) {
            return Ok(profile.clone());
        }

        let mut inner = self.inner.write().await;
        let profile = inner
            .learners
            .entry(learner_id)
            .or_insert_with(|| LearnerProfile::new(learner_id));
        Ok(profile.clone())
    }

    async fn completed_lessons(
        &self,
        learner_id: EntityId,
    ) -> Result<HashSet<EntityId>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .completions
            .keys()
            .filter(|key| key.learner_id == learner_id)
            .map(|key| key.lesson_id)
            .collect())
    }

    async fn approved_lessons(&self, learner_id: EntityId) -> Result<HashSet<EntityId>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .submissions
            .values()
            .filter(|s| s.learner_id == learner_id && s.status == SubmissionStatus::Approved)
            .map(|s| s.lesson_id)
            .collect())
    }

    async fn record_completion(
        &self,
        completion: &LessonCompletion,
        curve: &dyn LevelCurve,
        completed_at: Timestamp,
    ) -> Result<CompletionRecord, CoreError> {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        let key = completion.key;

        let profile = inner
            .learners
            .entry(key.learner_id)
            .or_insert_with(|| LearnerProfile::new(key.learner_id));

        if inner.completions.contains_key(&key) {
            tracing::debug!(
                learner_id = %key.learner_id,
                lesson_id = %key.lesson_id,
                "Completion already recorded, nothing applied"
            );
            return Ok(CompletionRecord {
                newly_recorded: false,
                leveled_up: false,
                profile: profile.clone(),
            });
        }

        // Apply the delta rather than the snapshot total so completions of
        // different lessons racing each other both count. The level follows
        // the stored XP, never the snapshot's `new_level`.
        let today = completed_at.date_naive();
        let previous_level = profile.level;
        profile.xp = profile.xp.saturating_add(u64::from(completion.xp_gained));
        profile.level = curve.level_for(profile.xp).max(previous_level);
        profile.streak_count = next_streak(profile.streak_count, profile.last_active_on, today);
        profile.last_active_on = Some(today);
        let profile = profile.clone();

        inner.completions.insert(key, completed_at);

        Ok(CompletionRecord {
            newly_recorded: true,
            leveled_up: profile.level > previous_level,
            profile,
        })
    }

    async fn list_pending_submissions(&self) -> Result<Vec<Submission>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .submissions
            .values()
            .filter(|s| s.is_pending())
            .cloned()
            .collect())
    }

    async fn get_submission(
        &self,
        submission_id: EntityId,
    ) -> Result<Option<Submission>, CoreError> {
        Ok(self.inner.read().await.submissions.get(&submission_id).cloned())
    }

    async fn create_submission(&self, input: &CreateSubmission) -> Result<Submission, CoreError> {
        let mut inner = self.inner.write().await;

        let existing = inner
            .submissions
            .values()
            .filter(|s| s.learner_id == input.learner_id && s.lesson_id == input.lesson_id)
            .map(|s| s.status);
        for status in existing {
            match status {
                SubmissionStatus::Approved => {
                    return Err(CoreError::Conflict(
                        "You have already submitted and had this boss battle approved."
                            .to_string(),
                    ))
                }
                SubmissionStatus::Pending => {
                    return Err(CoreError::Conflict(
                        "A submission for this boss battle is already awaiting review."
                            .to_string(),
                    ))
                }
                SubmissionStatus::Rejected => {}
            }
        }

        let submission = Submission {
            id: Uuid::new_v4(),
            learner_id: input.learner_id,
            lesson_id: input.lesson_id,
            video_url: input.video_url.clone(),
            status: SubmissionStatus::Pending,
            submitted_at: Utc::now(),
            feedback: None,
            reviewed_at: None,
            reviewed_by: None,
        };
        inner.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn save_graded_submission(&self, graded: &Submission) -> Result<Submission, CoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .submissions
            .get_mut(&graded.id)
            .ok_or(CoreError::NotFound {
                entity: "Submission",
                id: graded.id,
            })?;

        if !stored.is_pending() {
            return Err(CoreError::InvalidState {
                submission_id: stored.id,
                status: stored.status.as_str(),
            });
        }

        *stored = graded.clone();
        Ok(graded.clone())
    }

    async fn admin_stats(&self) -> Result<AdminStats, CoreError> {
        let inner = self.inner.read().await;
        Ok(AdminStats {
            total_learners: inner.learners.len(),
            pending_submissions: inner.submissions.values().filter(|s| s.is_pending()).count(),
            total_worlds: inner.worlds.len(),
            total_lessons: inner.lessons.len(),
        })
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
