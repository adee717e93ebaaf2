use std::ops::Range;

use rand::Rng;

use crate::model::{Category, Pet, PetStatus, Tag};
use crate::random::{self, PreconditionError};

/// Freshly generated pet ids.
pub const PET_IDS: Range<i64> = 1_000..10_000;

const CATEGORY_IDS: Range<i64> = 0..100;
const TAG_IDS: Range<i64> = 0..100;
const PHOTO_COUNT: Range<usize> = 1..4;
const TAG_COUNT: Range<usize> = 1..4;
const NAME_SUFFIX_LEN: usize = 5;

pub const PET_NAMES: &[&str] = &[
    "Buddy", "Luna", "Max", "Bella", "Charlie", "Lucy", "Cooper", "Daisy",
];

pub const CATEGORIES: &[&str] = &["Dogs", "Cats", "Birds", "Fish", "Reptiles"];

pub const TAGS: &[&str] = &["friendly", "playful", "quiet", "trained", "vaccinated"];

/// Fixed identity used when a scenario overwrites an existing pet.
pub const TEST_PET_NAME: &str = "Lion";

/// # Errors
///
/// Only if one of the built-in pools or ranges is empty.
pub fn random_pet(rng: &mut impl Rng) -> Result<Pet, PreconditionError> {
    Ok(Pet {
        id: pet_id(rng)?,
        category: Some(random_category(rng)?),
        name: random_name(rng)?,
        photo_urls: photo_urls(rng)?,
        tags: random_tags(rng)?,
        status: Some(*random::pick(rng, &PetStatus::ALL)?),
    })
}

/// Deterministic pet: everything but the id is constant.
///
/// # Errors
///
/// Only if the id range is empty.
pub fn test_pet(rng: &mut impl Rng) -> Result<Pet, PreconditionError> {
    Ok(Pet {
        id: pet_id(rng)?,
        category: Some(Category {
            id: 1,
            name: "mammal".into(),
        }),
        name: TEST_PET_NAME.into(),
        photo_urls: vec!["https://example.com/lion.jpg".into()],
        tags: vec![Tag {
            id: 1,
            name: "wild".into(),
        }],
        status: Some(PetStatus::Available),
    })
}

/// # Errors
///
/// Only if [`PET_IDS`] is empty.
pub fn pet_id(rng: &mut impl Rng) -> Result<i64, PreconditionError> {
    random::int_in(rng, PET_IDS)
}

fn random_name(rng: &mut impl Rng) -> Result<String, PreconditionError> {
    let base = random::pick(rng, PET_NAMES)?;
    let suffix = random::hex_suffix(rng, NAME_SUFFIX_LEN)?;
    Ok(format!("{base}_{suffix}"))
}

fn random_category(rng: &mut impl Rng) -> Result<Category, PreconditionError> {
    Ok(Category {
        id: random::int_in(rng, CATEGORY_IDS)?,
        name: (*random::pick(rng, CATEGORIES)?).to_string(),
    })
}

fn random_tags(rng: &mut impl Rng) -> Result<Vec<Tag>, PreconditionError> {
    let count = random::count_in(rng, TAG_COUNT)?;
    (0..count)
        .map(|_| {
            Ok(Tag {
                id: random::int_in(rng, TAG_IDS)?,
                name: (*random::pick(rng, TAGS)?).to_string(),
            })
        })
        .collect()
}

fn photo_urls(rng: &mut impl Rng) -> Result<Vec<String>, PreconditionError> {
    let count = random::count_in(rng, PHOTO_COUNT)?;
    Ok((0..count)
        .map(|_| format!("https://example.com/photo_{}.jpg", random::uuid(rng)))
        .collect())
}
