//! Filter drafts sent to the query backend
//!
//! A [`FilterDraft`] is only changed through [`FilterField`] updates and the
//! date/time setters, so the `getAll` flag and the ordering of the window
//! bounds are kept consistent by construction.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::Serialize;
use serde_with::skip_serializing_none;

use super::datetime::{create_iso_string_from_date_time, iso_offset, local_date, local_time, Bound};

/// Time policy of an availability view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    pub default_start: NaiveTime,
    pub default_end: NaiveTime,
    /// Valid local hours, `[from, to)`. Times outside are clamped into range.
    pub valid_hours: Option<(u32, u32)>,
}

impl WindowPolicy {
    /// Spaces are bookable between 07:00 and 18:59
    pub fn space() -> Self {
        Self {
            default_start: hm(7, 0),
            default_end: hm(18, 59),
            valid_hours: Some((7, 19)),
        }
    }

    /// Hardware windows use the same defaults but any hour is accepted
    pub fn hardware() -> Self {
        Self {
            default_start: hm(7, 0),
            default_end: hm(18, 59),
            valid_hours: None,
        }
    }

    pub fn default_time(&self, bound: Bound) -> NaiveTime {
        match bound {
            Bound::Start => self.default_start,
            Bound::End => self.default_end,
        }
    }

    pub fn is_valid_time(&self, time: NaiveTime) -> bool {
        match self.valid_hours {
            Some((from, to)) => (from..to).contains(&time.hour()),
            None => true,
        }
    }

    /// Bring `time` into the valid hours: too early becomes `from:00`,
    /// too late becomes `(to - 1):59`.
    pub fn clamp(&self, time: NaiveTime) -> NaiveTime {
        match self.valid_hours {
            Some((from, _)) if time.hour() < from => hm(from, 0),
            Some((_, to)) if time.hour() >= to => hm(to.saturating_sub(1), 59),
            _ => time,
        }
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Single filter update, the replacement for ad-hoc `{...prev, [key]: value}`
#[derive(Debug, Clone, PartialEq)]
pub enum FilterField {
    Email(Option<String>),
    NameLike(Option<String>),
    Type(Option<String>),
    Building(Option<i32>),
    Capacity(Option<u32>),
    IsHandedOver(Option<bool>),
    IsReturned(Option<bool>),
    PageSize(Option<u32>),
    Page(Option<u32>),
    OrderBy(Option<String>),
    AscOrder(Option<bool>),
}

/// Query filters for history and availability endpoints
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDraft {
    email: Option<String>,
    name_like: Option<String>,
    #[serde(rename = "type")]
    resource_type: Option<String>,
    building: Option<i32>,
    capacity: Option<u32>,
    #[serde(serialize_with = "iso_offset::serialize")]
    start_date: Option<DateTime<FixedOffset>>,
    #[serde(serialize_with = "iso_offset::serialize")]
    end_date: Option<DateTime<FixedOffset>>,
    get_all: bool,
    is_handed_over: Option<bool>,
    is_returned: Option<bool>,
    q_size: Option<u32>,
    q_page: Option<u32>,
    order_by: Option<String>,
    asc_order: Option<bool>,
}

impl Default for FilterDraft {
    fn default() -> Self {
        Self {
            email: None,
            name_like: None,
            resource_type: None,
            building: None,
            capacity: None,
            start_date: None,
            end_date: None,
            get_all: true,
            is_handed_over: None,
            is_returned: None,
            q_size: None,
            q_page: None,
            order_by: None,
            asc_order: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl FilterDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn name_like(&self) -> Option<&str> {
        self.name_like.as_deref()
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    pub fn building(&self) -> Option<i32> {
        self.building
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    pub fn start_date(&self) -> Option<&DateTime<FixedOffset>> {
        self.start_date.as_ref()
    }

    pub fn end_date(&self) -> Option<&DateTime<FixedOffset>> {
        self.end_date.as_ref()
    }

    /// True when no date bound is present: the backend returns the
    /// unfiltered set instead of an availability window.
    pub fn get_all(&self) -> bool {
        self.get_all
    }

    /// Apply one field update
    pub fn apply(mut self, field: FilterField) -> Self {
        match field {
            FilterField::Email(v) => self.email = non_blank(v),
            FilterField::NameLike(v) => self.name_like = non_blank(v),
            FilterField::Type(v) => self.resource_type = non_blank(v),
            FilterField::Building(v) => self.building = v,
            FilterField::Capacity(v) => self.capacity = v,
            FilterField::IsHandedOver(v) => self.is_handed_over = v,
            FilterField::IsReturned(v) => self.is_returned = v,
            FilterField::PageSize(v) => self.q_size = v,
            FilterField::Page(v) => self.q_page = v,
            FilterField::OrderBy(v) => self.order_by = non_blank(v),
            FilterField::AscOrder(v) => self.asc_order = v,
        }
        self.normalize()
    }

    /// Date currently selected in the picker: the start's, else the end's
    pub fn selected_date<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.start_date
            .as_ref()
            .or(self.end_date.as_ref())
            .map(|dt| local_date(tz, dt))
    }

    /// Move the window to `date`, keeping already chosen times.
    /// `None` removes both bounds.
    pub fn set_date<Tz: TimeZone>(
        mut self,
        policy: &WindowPolicy,
        tz: &Tz,
        date: Option<NaiveDate>,
    ) -> Self {
        let start_time = self
            .start_date
            .as_ref()
            .map(|dt| local_time(tz, dt))
            .unwrap_or(policy.default_start);
        let end_time = self
            .end_date
            .as_ref()
            .map(|dt| local_time(tz, dt))
            .unwrap_or(policy.default_end);

        self.start_date = date.map(|d| create_iso_string_from_date_time(tz, d, start_time));
        self.end_date = date.map(|d| create_iso_string_from_date_time(tz, d, end_time));
        self.normalize_window(policy, tz).normalize()
    }

    /// Set one bound's time on the selected date. Without a selected date
    /// the draft is returned unchanged.
    pub fn set_time<Tz: TimeZone>(
        mut self,
        policy: &WindowPolicy,
        tz: &Tz,
        bound: Bound,
        time: Option<NaiveTime>,
    ) -> Self {
        let Some(date) = self.selected_date(tz) else {
            return self;
        };

        let value = time.map(|t| create_iso_string_from_date_time(tz, date, t));
        match bound {
            Bound::Start => self.start_date = value,
            Bound::End => self.end_date = value,
        }

        // A window always has both ends once one is set
        match (&self.start_date, &self.end_date) {
            (Some(_), None) => {
                self.end_date = Some(create_iso_string_from_date_time(tz, date, policy.default_end));
            }
            (None, Some(_)) => {
                self.start_date =
                    Some(create_iso_string_from_date_time(tz, date, policy.default_start));
            }
            _ => {}
        }

        self.normalize_window(policy, tz).normalize()
    }

    /// Back to the empty draft
    pub fn clear(self) -> Self {
        Self::default()
    }

    fn normalize_window<Tz: TimeZone>(mut self, policy: &WindowPolicy, tz: &Tz) -> Self {
        let clamp = |dt: DateTime<FixedOffset>| {
            let time = local_time(tz, &dt);
            let clamped = policy.clamp(time);
            if clamped == time {
                dt
            } else {
                create_iso_string_from_date_time(tz, local_date(tz, &dt), clamped)
            }
        };
        self.start_date = self.start_date.map(clamp);
        self.end_date = self.end_date.map(clamp);
        self
    }

    fn normalize(mut self) -> Self {
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            if start > end {
                self.end_date = Some(*start);
            }
        }
        self.get_all = self.start_date.is_none() && self.end_date.is_none();
        self
    }
}

/// Editing draft and applied filters of one view
#[derive(Debug, Clone)]
pub struct FilterForm<Tz: TimeZone> {
    policy: WindowPolicy,
    tz: Tz,
    draft: FilterDraft,
    applied: FilterDraft,
}

impl<Tz: TimeZone> FilterForm<Tz> {
    pub fn new(policy: WindowPolicy, tz: Tz) -> Self {
        Self {
            policy,
            tz,
            draft: FilterDraft::default(),
            applied: FilterDraft::default(),
        }
    }

    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    /// Filters the current listing was fetched with
    pub fn applied(&self) -> &FilterDraft {
        &self.applied
    }

    pub fn update(&mut self, field: FilterField) {
        self.draft = std::mem::take(&mut self.draft).apply(field);
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.draft = std::mem::take(&mut self.draft).set_date(&self.policy, &self.tz, date);
    }

    pub fn set_time(&mut self, bound: Bound, time: Option<NaiveTime>) {
        self.draft = std::mem::take(&mut self.draft).set_time(&self.policy, &self.tz, bound, time);
    }

    /// Debounced name search goes straight to the applied filters
    pub fn search_name(&mut self, name: impl Into<String>) -> &FilterDraft {
        self.applied = std::mem::take(&mut self.applied).apply(FilterField::NameLike(Some(name.into())));
        &self.applied
    }

    pub fn apply(&mut self) -> &FilterDraft {
        self.applied = self.draft.clone();
        &self.applied
    }

    pub fn clear(&mut self) {
        self.draft = FilterDraft::default();
        self.applied = FilterDraft::default();
    }
}
