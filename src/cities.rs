use crate::models::City;

/// Country appended to city names in prompts.
pub const REGION: &str = "Kenya";

pub const CITIES: [City; 7] = [
    City {
        name: "Nairobi",
        slug: "nairobi",
        description: "The bustling capital city",
    },
    City {
        name: "Mombasa",
        slug: "mombasa",
        description: "Coastal city with rich history",
    },
    City {
        name: "Kisumu",
        slug: "kisumu",
        description: "Lakeside city on Victoria",
    },
    City {
        name: "Nakuru",
        slug: "nakuru",
        description: "Home of the flamingos",
    },
    City {
        name: "Eldoret",
        slug: "eldoret",
        description: "City of champions",
    },
    City {
        name: "Malindi",
        slug: "malindi",
        description: "Tropical paradise",
    },
    City {
        name: "Thika",
        slug: "thika",
        description: "Industrial hub",
    },
];

pub fn default_city() -> City {
    CITIES[0]
}

pub fn find_by_slug(slug: &str) -> Option<City> {
    CITIES.iter().find(|city| city.slug == slug).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        for (i, city) in CITIES.iter().enumerate() {
            assert!(
                CITIES[i + 1..].iter().all(|other| other.slug != city.slug),
                "duplicate slug {}",
                city.slug
            );
        }
    }

    #[test]
    fn finds_cities_by_slug() {
        assert_eq!(find_by_slug("kisumu").map(|c| c.name), Some("Kisumu"));
        assert!(find_by_slug("lagos").is_none());
        assert_eq!(default_city().slug, "nairobi");
    }
}
