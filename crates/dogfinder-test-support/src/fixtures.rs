//! Dog fixtures.

use dogfinder_api_models::Dog;

const BREEDS: [&str; 4] = ["Beagle", "Labrador", "Pug", "Shiba Inu"];

/// A single dog with the given identity fields.
#[must_use]
pub fn dog(id: &str, name: &str, breed: &str, age: u32, zip_code: &str) -> Dog {
    Dog {
        id: id.to_string(),
        img: format!("https://images.example/{id}.jpg"),
        name: name.to_string(),
        age,
        zip_code: zip_code.to_string(),
        breed: breed.to_string(),
    }
}

/// `count` distinct dogs with ids `dog-000`, `dog-001`, ...
///
/// Breeds cycle through a small fixed list, ages through 0..15 and zips
/// alternate between two values.
#[must_use]
pub fn dogs(count: usize) -> Vec<Dog> {
    (0..count)
        .map(|index| {
            let age = u32::try_from(index % 15).unwrap_or(0);
            let zip = if index % 2 == 0 { "10001" } else { "94105" };
            dog(
                &format!("dog-{index:03}"),
                &format!("Dog {index:03}"),
                BREEDS[index % BREEDS.len()],
                age,
                zip,
            )
        })
        .collect()
}
