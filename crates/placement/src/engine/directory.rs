use super::category::Category;
use serde::{Deserialize, Serialize};

/// Label rendered when no school in the directory serves a category.
pub const NO_PLACEMENT: &str = "No placement available";
/// Program label paired with [`NO_PLACEMENT`].
pub const NO_PROGRAM: &str = "N/A";

/// Senior high school entry in the placement directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub code: String,
    pub region: String,
    pub category: Category,
    pub programs: Vec<String>,
    pub capacity: u32,
    /// Published cut-off; informational only, matching goes by category.
    pub max_aggregate: u32,
}

impl School {
    pub fn offers(&self, program: &str) -> bool {
        self.programs
            .iter()
            .any(|offered| offered.eq_ignore_ascii_case(program.trim()))
    }

    pub fn first_program(&self) -> Option<&str> {
        self.programs.first().map(String::as_str)
    }
}

/// Returns the first school in `schools` serving `category`.
///
/// Directory order is a ranking, so the first match is the strongest candidate.
pub fn match_school(category: Category, schools: &[School]) -> Option<&School> {
    schools.iter().find(|school| school.category == category)
}

/// Ordered, read-only school directory supplied to the engine by its caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchoolDirectory {
    schools: Vec<School>,
}

impl SchoolDirectory {
    pub fn new(schools: Vec<School>) -> Self {
        Self { schools }
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn match_school(&self, category: Category) -> Option<&School> {
        match_school(category, &self.schools)
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &School> {
        self.schools
            .iter()
            .filter(move |school| school.category == category)
    }

    pub fn in_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a School> {
        self.schools
            .iter()
            .filter(move |school| school.region.eq_ignore_ascii_case(region.trim()))
    }

    pub fn offering<'a>(&'a self, program: &'a str) -> impl Iterator<Item = &'a School> {
        self.schools
            .iter()
            .filter(move |school| school.offers(program))
    }

    /// Sample directory of Ghanaian senior high schools, strongest first within each category.
    pub fn ghana_sample() -> Self {
        use Category::{Good, Standard, TopTier};

        const CORE_TRACK: &[&str] = &["Science", "General Arts", "Business"];
        const GIRLS_TRACK: &[&str] = &["Science", "Home Economics", "General Arts"];
        const PRESEC_TRACK: &[&str] = &["Science", "Business", "General Arts"];

        let rows: [(&str, &str, Category, &[&str], u32, u32); 24] = [
            ("Achimota School", "Greater Accra", TopTier, CORE_TRACK, 500, 6),
            ("Wesley Girls' High School", "Central", TopTier, GIRLS_TRACK, 400, 6),
            (
                "Presbyterian Boys' Secondary School (PRESEC)",
                "Greater Accra",
                TopTier,
                PRESEC_TRACK,
                600,
                6,
            ),
            ("Opoku Ware School", "Ashanti", TopTier, CORE_TRACK, 550, 6),
            ("Mfantsipim School", "Central", TopTier, CORE_TRACK, 500, 6),
            ("St. Augustine's College", "Central", TopTier, CORE_TRACK, 450, 6),
            ("Prempeh College", "Ashanti", TopTier, CORE_TRACK, 500, 6),
            ("Holy Child School", "Central", TopTier, GIRLS_TRACK, 400, 6),
            ("Adisadel College", "Central", TopTier, CORE_TRACK, 500, 6),
            (
                "Aburi Girls' Senior High School",
                "Eastern",
                TopTier,
                GIRLS_TRACK,
                400,
                6,
            ),
            ("Ghana National College", "Greater Accra", Good, CORE_TRACK, 400, 15),
            ("St. Peter's Senior High School", "Central", Good, CORE_TRACK, 350, 15),
            ("Keta Senior High School", "Volta", Good, CORE_TRACK, 300, 15),
            ("Tamale Senior High School", "Northern", Good, CORE_TRACK, 400, 15),
            ("St. Louis Senior High School", "Northern", Good, CORE_TRACK, 300, 15),
            ("St. Roses Senior High School", "Ashanti", Good, GIRLS_TRACK, 350, 15),
            ("St. Mary's Senior High School", "Greater Accra", Good, CORE_TRACK, 300, 15),
            (
                "St. Thomas Aquinas Senior High School",
                "Greater Accra",
                Good,
                CORE_TRACK,
                350,
                15,
            ),
            ("St. Monica's Senior High School", "Ashanti", Standard, CORE_TRACK, 300, 30),
            ("St. John's School, Sekondi", "Western", Standard, CORE_TRACK, 250, 30),
            ("St. Paul's Senior High School", "Eastern", Standard, CORE_TRACK, 300, 30),
            (
                "St. Augustine's Senior High School",
                "Greater Accra",
                Standard,
                CORE_TRACK,
                250,
                30,
            ),
            ("St. Martin's Senior High School", "Ashanti", Standard, CORE_TRACK, 300, 30),
            ("St. Anthony's Senior High School", "Central", Standard, CORE_TRACK, 250, 30),
        ];

        let schools = rows
            .iter()
            .enumerate()
            .map(
                |(position, (name, region, category, programs, capacity, max_aggregate))| School {
                    name: name.to_string(),
                    code: format!("{}", 1_000_001 + position),
                    region: region.to_string(),
                    category: *category,
                    programs: programs.iter().map(|program| program.to_string()).collect(),
                    capacity: *capacity,
                    max_aggregate: *max_aggregate,
                },
            )
            .collect();

        Self::new(schools)
    }
}
