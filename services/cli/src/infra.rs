use chrono::NaiveDate;
use placement::engine::{Category, Preference, SubjectCode, ThresholdPreset};

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_preset(raw: &str) -> Result<ThresholdPreset, String> {
    ThresholdPreset::parse(raw)
        .ok_or_else(|| format!("unknown threshold table '{raw}' (expected bece or legacy)"))
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw)
        .ok_or_else(|| format!("unknown category '{raw}' (expected A, B, C, or D)"))
}

/// `CODE=SCORE`, for example `ENG=65`.
pub(crate) fn parse_score_arg(raw: &str) -> Result<(SubjectCode, i32), String> {
    let (code, score) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=SCORE, got '{raw}'"))?;
    let code = SubjectCode::new(code);
    if code.is_blank() {
        return Err(format!("missing subject code in '{raw}'"));
    }
    let score = score
        .trim()
        .parse::<i32>()
        .map_err(|err| format!("invalid score in '{raw}' ({err})"))?;
    Ok((code, score))
}

/// `School:Program`, both parts required.
pub(crate) fn parse_preference(raw: &str) -> Result<Preference, String> {
    let (school, program) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected School:Program, got '{raw}'"))?;
    let preference = Preference::new(school.trim(), program.trim());
    if !preference.is_complete() {
        return Err(format!("school and program are both required in '{raw}'"));
    }
    Ok(preference)
}
