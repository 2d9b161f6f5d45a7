use std::cmp::Ordering;

use log::debug;
use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    backends::Instant,
    permission::{
        error::{DenialKind, PermissionError},
        permission_result::PermissionResult,
    },
    value::value::Value,
};

/// Item limit meaning "no limit".
pub const UNLIMITED_ITEMS: u32 = u32::MAX;
/// Window length used when no rate limit is configured.
pub const DEFAULT_TIME_SECONDS: f64 = 9_999_999_999.0;

/// A named, quota- and rate-limited, optionally value-bounded rule.
///
/// Checks run in a fixed order: the allowed flag, the total item quota, then
/// the per-window quota. Bounds are only consulted when all three pass.
///
/// Counters and the window clock are runtime state. They are never
/// serialized, and cloning a `Permission` yields fresh counters with the
/// same policy.
#[derive(Debug)]
pub struct Permission {
    name: String,
    allowed: bool,
    max_items: u32,
    current_items: u32,
    max_items_per_time: u32,
    current_items_per_time: u32,
    time_seconds: f64,
    window_start: Option<Instant>,
    lower_bounds: Option<Value>,
    upper_bounds: Option<Value>,
    adjust_bounds: bool,
}

impl Permission {
    /// A permission with no quota, rate limit or bounds.
    pub fn new(name: &str, allowed: bool) -> Self {
        Self {
            name: name.to_string(),
            allowed,
            max_items: UNLIMITED_ITEMS,
            current_items: 0,
            max_items_per_time: UNLIMITED_ITEMS,
            current_items_per_time: 0,
            time_seconds: DEFAULT_TIME_SECONDS,
            window_start: None,
            lower_bounds: None,
            upper_bounds: None,
            adjust_bounds: true,
        }
    }

    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = max_items;
        self
    }

    /// Allows at most `max_items_per_time` items every `time_seconds`.
    pub fn with_rate(mut self, max_items_per_time: u32, time_seconds: f64) -> Self {
        self.max_items_per_time = max_items_per_time;
        self.time_seconds = time_seconds;
        self
    }

    pub fn with_bounds(
        mut self,
        lower_bounds: Option<Value>,
        upper_bounds: Option<Value>,
        adjust_bounds: bool,
    ) -> Self {
        self.lower_bounds = lower_bounds;
        self.upper_bounds = upper_bounds;
        self.adjust_bounds = adjust_bounds;
        self
    }

    /// Classifies a result: only `Allowed` and `BoundsAdjusted` proceed.
    pub fn allows(result: PermissionResult) -> bool {
        result.is_allowed()
    }

    // Checks

    pub fn check_permission(&mut self) -> PermissionResult {
        self.check_permission_at(&Instant::now())
    }

    /// Runs the flag, quota and rate checks as of `now`.
    pub fn check_permission_at(&mut self, now: &Instant) -> PermissionResult {
        if !self.allowed {
            return PermissionResult::Denied;
        }

        if self.current_items >= self.max_items {
            return PermissionResult::TooManyItems;
        }

        // Roll the window over before comparing against it.
        match self.window_start {
            None => self.window_start = Some(*now),
            Some(start) => {
                if now.duration_since(&start).as_secs_f64() >= self.time_seconds {
                    self.current_items_per_time = 0;
                    self.window_start = Some(*now);
                }
            }
        }

        if self.current_items_per_time >= self.max_items_per_time {
            return PermissionResult::TooManyItemsPerTimeframe;
        }

        PermissionResult::Allowed
    }

    /// Checks the permission, then checks `value` against the bounds. On
    /// `BoundsAdjusted` the value has been clamped in place.
    pub fn check_permission_value(&mut self, value: &mut Value) -> PermissionResult {
        self.check_permission_value_at(value, &Instant::now())
    }

    pub fn check_permission_value_at(
        &mut self,
        value: &mut Value,
        now: &Instant,
    ) -> PermissionResult {
        let result = self.check_permission_at(now);
        if result != PermissionResult::Allowed {
            return result;
        }
        self.check_bounds(value)
    }

    pub fn check_permission_allowed(&mut self) -> bool {
        self.check_permission().is_allowed()
    }

    pub fn check_permission_value_allowed(&mut self, value: &mut Value) -> bool {
        self.check_permission_value(value).is_allowed()
    }

    /// Converts a refusal into `PermissionDenied`, using the result
    /// description as the reason.
    pub fn check_permission_throws(&mut self, location: &str) -> Result<(), PermissionError> {
        let now = Instant::now();
        let result = self.check_permission_at(&now);
        self.denial_error(result, None, location, &now)
    }

    /// As [`check_permission_throws`](Self::check_permission_throws) with a
    /// caller-supplied reason.
    pub fn check_permission_throws_with(
        &mut self,
        description: &str,
        location: &str,
    ) -> Result<(), PermissionError> {
        let now = Instant::now();
        let result = self.check_permission_at(&now);
        self.denial_error(result, Some(description), location, &now)
    }

    /// Value-checking form of
    /// [`check_permission_throws`](Self::check_permission_throws). Returns the
    /// result so callers can tell `Allowed` from `BoundsAdjusted`.
    pub fn check_permission_value_throws(
        &mut self,
        value: &mut Value,
        location: &str,
    ) -> Result<PermissionResult, PermissionError> {
        let now = Instant::now();
        let result = self.check_permission_value_at(value, &now);
        self.denial_error(result, None, location, &now)?;
        Ok(result)
    }

    fn denial_error(
        &self,
        result: PermissionResult,
        description: Option<&str>,
        location: &str,
        now: &Instant,
    ) -> Result<(), PermissionError> {
        let Some(kind) = DenialKind::from_result(result) else {
            return Ok(());
        };
        let reason = match description {
            Some(description) => description.to_string(),
            None => self.describe_at(result, now),
        };
        Err(PermissionError::PermissionDenied {
            kind,
            name: self.name.clone(),
            reason,
            location: location.to_string(),
        })
    }

    fn check_bounds(&self, value: &mut Value) -> PermissionResult {
        if self.lower_bounds.is_none() && self.upper_bounds.is_none() {
            return PermissionResult::Allowed;
        }

        let target = value.binding_type();
        let Ok(lower) = self
            .lower_bounds
            .as_ref()
            .map(|bounds| bounds.coerce_to(target))
            .transpose()
        else {
            return PermissionResult::Denied;
        };
        let Ok(upper) = self
            .upper_bounds
            .as_ref()
            .map(|bounds| bounds.coerce_to(target))
            .transpose()
        else {
            return PermissionResult::Denied;
        };

        if target.is_multi_axis() {
            self.check_axes(value, lower.as_ref(), upper.as_ref())
        } else {
            self.check_scalar(value, lower, upper)
        }
    }

    // Each axis is tested on its own, and the adjusted axes are written back
    // in one go.
    fn check_axes(
        &self,
        value: &mut Value,
        lower: Option<&Value>,
        upper: Option<&Value>,
    ) -> PermissionResult {
        let Some(mut axes) = value.axes() else {
            return PermissionResult::Denied;
        };
        let lower_axes = lower.and_then(Value::axes);
        let upper_axes = upper.and_then(Value::axes);

        let mut out_of_bounds = false;
        for (index, axis) in axes.iter_mut().enumerate() {
            if axis.is_nan() {
                return PermissionResult::BoundsDenied;
            }
            if let Some(bound) = lower_axes.as_ref().and_then(|axes| axes.get(index)) {
                if *axis < *bound {
                    *axis = *bound;
                    out_of_bounds = true;
                    continue;
                }
            }
            if let Some(bound) = upper_axes.as_ref().and_then(|axes| axes.get(index)) {
                if *axis > *bound {
                    *axis = *bound;
                    out_of_bounds = true;
                }
            }
        }

        if !out_of_bounds {
            return PermissionResult::Allowed;
        }
        if !self.adjust_bounds {
            return PermissionResult::BoundsDenied;
        }

        match value.with_axes(&axes) {
            Some(adjusted) => {
                debug!("Permission {} clamped {} to {}", self.name, value, adjusted);
                *value = adjusted;
                PermissionResult::BoundsAdjusted
            }
            None => PermissionResult::Denied,
        }
    }

    fn check_scalar(
        &self,
        value: &mut Value,
        lower: Option<Value>,
        upper: Option<Value>,
    ) -> PermissionResult {
        let mut adjusted = None;

        if let Some(lower) = lower {
            match value.compare(&lower) {
                Ok(Ordering::Less) => adjusted = Some(lower),
                Ok(_) => {}
                Err(_) => return PermissionResult::BoundsDenied,
            }
        }
        if adjusted.is_none() {
            if let Some(upper) = upper {
                match value.compare(&upper) {
                    Ok(Ordering::Greater) => adjusted = Some(upper),
                    Ok(_) => {}
                    Err(_) => return PermissionResult::BoundsDenied,
                }
            }
        }

        let Some(adjusted) = adjusted else {
            return PermissionResult::Allowed;
        };
        if !self.adjust_bounds {
            return PermissionResult::BoundsDenied;
        }

        debug!("Permission {} clamped {} to {}", self.name, value, adjusted);
        *value = adjusted;
        PermissionResult::BoundsAdjusted
    }

    // Counters

    /// Records one more item. Returns the item count before the call.
    ///
    /// Adding past the item limit is a caller bug: callers must check the
    /// permission first.
    pub fn add_item(&mut self) -> Result<u32, PermissionError> {
        if self.current_items >= self.max_items {
            return Err(PermissionError::InvalidState {
                name: self.name.clone(),
                context: format!(
                    "cannot add an item, {} of {} already in use",
                    self.current_items, self.max_items
                ),
            });
        }
        let previous = self.current_items;
        self.current_items += 1;
        self.current_items_per_time = self.current_items_per_time.saturating_add(1);
        Ok(previous)
    }

    /// Releases one item. Returns the item count before the call.
    pub fn remove_item(&mut self, remove_from_items_per_time: bool) -> Result<u32, PermissionError> {
        if self.current_items == 0 {
            return Err(PermissionError::InvalidState {
                name: self.name.clone(),
                context: "cannot remove an item, none are in use".to_string(),
            });
        }
        let previous = self.current_items;
        self.current_items -= 1;
        if remove_from_items_per_time {
            self.current_items_per_time = self.current_items_per_time.saturating_sub(1);
        }
        Ok(previous)
    }

    pub fn reset_items(&mut self) {
        self.current_items = 0;
        self.current_items_per_time = 0;
    }

    // Descriptions

    pub fn describe(&self, result: PermissionResult) -> String {
        self.describe_at(result, &Instant::now())
    }

    /// Human-readable explanation of `result`. The rate limit message
    /// includes the time left in the current window as of `now`.
    pub fn describe_at(&self, result: PermissionResult, now: &Instant) -> String {
        match result {
            PermissionResult::Denied => "Permission denied.".to_string(),
            PermissionResult::TooManyItems => "Permission denied, too many items.".to_string(),
            PermissionResult::TooManyItemsPerTimeframe => format!(
                "Permission denied, too many actions at the same time. Wait {:.1} seconds to try again.",
                self.seconds_left_in_window(now)
            ),
            PermissionResult::BoundsDenied => "Permission denied, value out of bounds.".to_string(),
            PermissionResult::BoundsAdjusted => {
                "Allowed, but value was adjusted to bounds.".to_string()
            }
            PermissionResult::Allowed => "Allowed.".to_string(),
        }
    }

    fn seconds_left_in_window(&self, now: &Instant) -> f64 {
        let elapsed = match &self.window_start {
            Some(start) => now.duration_since(start).as_secs_f64(),
            None => 0.0,
        };
        (self.time_seconds - elapsed).max(0.0)
    }

    // Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn set_allowed(&mut self, allowed: bool) {
        self.allowed = allowed;
    }

    pub fn max_items(&self) -> u32 {
        self.max_items
    }

    pub fn set_max_items(&mut self, max_items: u32) {
        self.max_items = max_items;
    }

    pub fn current_items(&self) -> u32 {
        self.current_items
    }

    pub fn max_items_per_time(&self) -> u32 {
        self.max_items_per_time
    }

    pub fn set_max_items_per_time(&mut self, max_items_per_time: u32) {
        self.max_items_per_time = max_items_per_time;
    }

    pub fn current_items_per_time(&self) -> u32 {
        self.current_items_per_time
    }

    pub fn time_seconds(&self) -> f64 {
        self.time_seconds
    }

    pub fn set_time_seconds(&mut self, time_seconds: f64) {
        self.time_seconds = time_seconds;
    }

    pub fn lower_bounds(&self) -> Option<&Value> {
        self.lower_bounds.as_ref()
    }

    pub fn set_lower_bounds(&mut self, lower_bounds: Value) {
        self.lower_bounds = Some(lower_bounds);
    }

    pub fn remove_lower_bounds(&mut self) {
        self.lower_bounds = None;
    }

    pub fn upper_bounds(&self) -> Option<&Value> {
        self.upper_bounds.as_ref()
    }

    pub fn set_upper_bounds(&mut self, upper_bounds: Value) {
        self.upper_bounds = Some(upper_bounds);
    }

    pub fn remove_upper_bounds(&mut self) {
        self.upper_bounds = None;
    }

    pub fn adjust_bounds(&self) -> bool {
        self.adjust_bounds
    }

    pub fn set_adjust_bounds(&mut self, adjust_bounds: bool) {
        self.adjust_bounds = adjust_bounds;
    }

    /// Replaces the policy with `other`'s, keeping the name and counters.
    pub fn set_policy_from(&mut self, other: &Permission) {
        self.allowed = other.allowed;
        self.max_items = other.max_items;
        self.max_items_per_time = other.max_items_per_time;
        self.time_seconds = other.time_seconds;
        self.lower_bounds = other.lower_bounds.clone();
        self.upper_bounds = other.upper_bounds.clone();
        self.adjust_bounds = other.adjust_bounds;
    }
}

impl Clone for Permission {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            allowed: self.allowed,
            max_items: self.max_items,
            current_items: 0,
            max_items_per_time: self.max_items_per_time,
            current_items_per_time: 0,
            time_seconds: self.time_seconds,
            window_start: None,
            lower_bounds: self.lower_bounds.clone(),
            upper_bounds: self.upper_bounds.clone(),
            adjust_bounds: self.adjust_bounds,
        }
    }
}

/// Permissions compare by policy. Counters and the window clock are ignored.
impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.allowed == other.allowed
            && self.max_items == other.max_items
            && self.max_items_per_time == other.max_items_per_time
            && self.time_seconds.to_bits() == other.time_seconds.to_bits()
            && self.lower_bounds == other.lower_bounds
            && self.upper_bounds == other.upper_bounds
            && self.adjust_bounds == other.adjust_bounds
    }
}

impl Serde for Permission {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.allowed.ser(writer);
        self.max_items.ser(writer);
        self.max_items_per_time.ser(writer);
        self.time_seconds.ser(writer);
        self.lower_bounds.ser(writer);
        self.upper_bounds.ser(writer);
        self.adjust_bounds.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let name = String::de(reader)?;
        let allowed = bool::de(reader)?;
        let max_items = u32::de(reader)?;
        let max_items_per_time = u32::de(reader)?;
        let time_seconds = f64::de(reader)?;
        let lower_bounds = Option::<Value>::de(reader)?;
        let upper_bounds = Option::<Value>::de(reader)?;
        let adjust_bounds = bool::de(reader)?;

        Ok(Permission::new(&name, allowed)
            .with_max_items(max_items)
            .with_rate(max_items_per_time, time_seconds)
            .with_bounds(lower_bounds, upper_bounds, adjust_bounds))
    }

    fn bit_length(&self) -> u32 {
        self.name.bit_length()
            + self.allowed.bit_length()
            + self.max_items.bit_length()
            + self.max_items_per_time.bit_length()
            + self.time_seconds.bit_length()
            + self.lower_bounds.bit_length()
            + self.upper_bounds.bit_length()
            + self.adjust_bounds.bit_length()
    }
}
