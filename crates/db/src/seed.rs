//! Demo catalog for local development (`SEED_DEMO_CATALOG=true`).

use chrono::Utc;
use mambo_core::curriculum::Difficulty;
use uuid::Uuid;

use crate::models::course::{Lesson, World};

/// `(title, xp_value, is_boss_battle, duration_minutes)` per lesson.
type LessonSpec = (&'static str, u32, bool, u32);

const BASICS: &[LessonSpec] = &[
    ("Finding the Clave", 50, false, 6),
    ("The Basic Step", 50, false, 8),
    ("Side Basic", 50, false, 7),
    ("Right Turn", 75, false, 9),
    ("Boss Battle: Basics Routine", 200, true, 3),
];

const SHINES: &[LessonSpec] = &[
    ("Suzie Q", 75, false, 8),
    ("Cross Over Shine", 75, false, 10),
    ("Boss Battle: Shine Combo", 300, true, 4),
];

/// Two worlds: a free beginner world and a paid intermediate world, each
/// ending in a boss battle.
pub fn demo_catalog() -> (Vec<World>, Vec<Lesson>) {
    let basics = world("Mambo Basics", "mambo-basics", Difficulty::Beginner, 1, true);
    let shines = world("Shines & Footwork", "shines-footwork", Difficulty::Intermediate, 2, false);

    let lessons = lessons_for(&basics, BASICS)
        .chain(lessons_for(&shines, SHINES))
        .collect();

    (vec![basics, shines], lessons)
}

fn world(
    title: &str,
    slug: &str,
    difficulty: Difficulty,
    order_index: i32,
    is_free: bool,
) -> World {
    let now = Utc::now();
    World {
        id: Uuid::new_v4(),
        title: title.to_string(),
        slug: slug.to_string(),
        description: format!("{title} on the 2"),
        image_url: format!("/images/worlds/{slug}.jpg"),
        difficulty,
        order_index,
        is_free,
        is_published: true,
        created_at: now,
        updated_at: now,
    }
}

fn lessons_for<'a>(world: &'a World, specs: &'a [LessonSpec]) -> impl Iterator<Item = Lesson> + 'a {
    specs
        .iter()
        .enumerate()
        .map(move |(i, (title, xp_value, is_boss_battle, duration_minutes))| Lesson {
            id: Uuid::new_v4(),
            world_id: world.id,
            title: (*title).to_string(),
            description: String::new(),
            video_url: format!("/videos/{}/{}.mp4", world.slug, i + 1),
            xp_value: *xp_value,
            order_index: i as i32 + 1,
            is_boss_battle: *is_boss_battle,
            duration_minutes: *duration_minutes,
            created_at: world.created_at,
        })
}
