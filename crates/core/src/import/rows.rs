//! Resolution steps shared by report and plan imports.

use uuid::Uuid;

use crate::import::error::RowError;
use crate::import::reference::{ActivityTypeRef, IndicatorRef, ReferenceIndex, ResolvedLocations};
use crate::import::sheet::SheetRow;
use crate::location::AdminLevel;

/// Collects the errors of one row.
pub(crate) struct RowErrors {
    line: usize,
    errors: Vec<RowError>,
}

impl RowErrors {
    pub(crate) fn new(row: &SheetRow) -> Self {
        Self {
            line: row.line(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, message: String) {
        self.errors.push(RowError {
            row: self.line,
            message,
        });
    }

    pub(crate) fn push_error(&mut self, error: RowError) {
        self.errors.push(error);
    }

    pub(crate) fn unknown(&mut self, label: &str, value: &str) {
        self.push(format!("Row {}: {label} '{value}' does not exist.", self.line));
    }

    pub(crate) const fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<RowError> {
        self.errors
    }
}

/// Activity references of a row.
pub(crate) struct ResolvedActivity<'a> {
    pub(crate) activity_domain_id: Uuid,
    pub(crate) activity_type: &'a ActivityTypeRef,
    pub(crate) activity_detail_id: Option<Uuid>,
    pub(crate) indicator: &'a IndicatorRef,
}

/// Resolves domain, type, detail and indicator.
///
/// The type must belong to the domain and the indicator to the type.
/// `allowed_domains` restricts domains to those of the project when given.
pub(crate) fn resolve_activity<'a>(
    index: &'a ReferenceIndex,
    row: &SheetRow,
    allowed_domains: Option<&[Uuid]>,
    errors: &mut RowErrors,
) -> Option<ResolvedActivity<'a>> {
    let line = errors.line();
    let domain_code = row.get("activity_domain")?;
    let type_code = row.get("activity_type")?;
    let indicator_name = row.get("indicator")?;

    let Some((activity_domain_id, domain_name)) = index
        .activity_domain(domain_code)
        .filter(|(id, _)| allowed_domains.is_none_or(|allowed| allowed.contains(id)))
    else {
        let suffix = if allowed_domains.is_some() { " in the project plan" } else { "" };
        errors.push(format!(
            "Row {line}: Activity domain '{domain_code}' does not exist{suffix}."
        ));
        return None;
    };

    let Some(activity_type) = index
        .activity_type(type_code)
        .filter(|t| t.activity_domain_id == activity_domain_id)
    else {
        errors.push(format!(
            "Row {line}: Activity Domain {domain_name} does not have Activity Type '{type_code}'"
        ));
        return None;
    };

    let Some(indicator) = index
        .indicator(indicator_name)
        .filter(|i| i.activity_type_ids.contains(&activity_type.id))
    else {
        errors.push(format!(
            "Row {line}: Activity Type {} does not have Indicator '{indicator_name}'",
            activity_type.name
        ));
        return None;
    };

    let activity_detail_id = match row.get("activity_detail") {
        None => None,
        Some(code) => match index.activity_detail(code) {
            Some(id) => Some(id),
            None => {
                errors.unknown("Activity detail", code);
                return None;
            }
        },
    };

    Some(ResolvedActivity {
        activity_domain_id,
        activity_type,
        activity_detail_id,
        indicator,
    })
}

/// Resolves the country / province / district / zone chain of a row.
///
/// Each level has to exist and sit under the level above it.
pub(crate) fn resolve_locations(
    index: &ReferenceIndex,
    row: &SheetRow,
    errors: &mut RowErrors,
) -> Option<ResolvedLocations> {
    let line = errors.line();
    let mut missing = |level: AdminLevel, code: &str| {
        let label = level_label(level);
        errors.push(format!(
            "Row {line}: {label} '{code}' does not exist. Check the {label} code."
        ));
    };

    let country_code = row.get("admin0pcode")?;
    let Some(country) = index.location_at(country_code, AdminLevel::Country, None) else {
        missing(AdminLevel::Country, country_code);
        return None;
    };
    let province_code = row.get("admin1pcode")?;
    let Some(province) = index.location_at(province_code, AdminLevel::Province, Some(country)) else {
        missing(AdminLevel::Province, province_code);
        return None;
    };
    let district_code = row.get("admin2pcode")?;
    let Some(district) = index.location_at(district_code, AdminLevel::District, Some(province)) else {
        missing(AdminLevel::District, district_code);
        return None;
    };
    let zone_id = match row.get("zone") {
        None => None,
        Some(code) => match index.location_at(code, AdminLevel::Zone, Some(district)) {
            Some(zone) => Some(zone.id),
            None => {
                missing(AdminLevel::Zone, code);
                return None;
            }
        },
    };

    Some(ResolvedLocations {
        country_id: country.id,
        province_id: province.id,
        district_id: district.id,
        zone_id,
    })
}

/// Resolves an optional named reference, recording an error when the
/// value is given but unknown.
pub(crate) fn optional_ref(
    row: &SheetRow,
    column: &str,
    label: &str,
    lookup: impl Fn(&str) -> Option<Uuid>,
    errors: &mut RowErrors,
) -> Option<Uuid> {
    let value = row.get(column)?;
    let found = lookup(value);
    if found.is_none() {
        errors.unknown(label, value);
    }
    found
}

fn level_label(level: AdminLevel) -> &'static str {
    match level {
        AdminLevel::Country => "Country",
        AdminLevel::Province => "Province",
        AdminLevel::District => "District",
        AdminLevel::Zone => "Zone",
    }
}
