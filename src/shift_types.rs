use serde::Serialize;

/// Display and timing attributes for one shift code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShiftTypeSpec {
    pub code: &'static str,
    pub name: &'static str,
    pub time: &'static str,
    pub start_hour: u32,
    pub duration: u32,
    pub color: &'static str,
}

pub static SHIFT_TYPES: [ShiftTypeSpec; 5] = [
    ShiftTypeSpec {
        code: "A",
        name: "A Shift",
        time: "6:00 AM - 2:00 PM",
        start_hour: 6,
        duration: 8,
        color: "#90EE90",
    },
    ShiftTypeSpec {
        code: "B",
        name: "B Shift",
        time: "4:00 PM - 12:00 AM",
        start_hour: 16,
        duration: 8,
        color: "#87CEEB",
    },
    ShiftTypeSpec {
        code: "C",
        name: "C Shift",
        time: "12:00 AM - 8:00 AM",
        start_hour: 0,
        duration: 8,
        color: "#DDA0DD",
    },
    ShiftTypeSpec {
        code: "G1",
        name: "G1 Shift",
        time: "12:00 PM - 8:00 PM",
        start_hour: 12,
        duration: 8,
        color: "#F0E68C",
    },
    ShiftTypeSpec {
        code: "G2",
        name: "G2 Shift",
        time: "9:00 AM - 5:00 PM",
        start_hour: 9,
        duration: 8,
        color: "#FFB6C1",
    },
];

/// Names written to an empty caregiver collection, in id order.
pub const CAREGIVER_SEED: [&str; 8] = ["CG1", "CG2", "CG3", "CG4", "CG5", "CG6", "CG7", "CG8"];

pub const SHIFTS_PER_WEEK: u32 = 5;
pub const HOURS_PER_SHIFT: u32 = 8;
pub const HOURS_PER_WEEK: u32 = 40;

impl ShiftTypeSpec {
    pub fn lookup(code: &str) -> Option<&'static ShiftTypeSpec> {
        SHIFT_TYPES.iter().find(|spec| spec.code == code)
    }

    pub fn codes() -> impl Iterator<Item = &'static str> {
        SHIFT_TYPES.iter().map(|spec| spec.code)
    }

    /// Hour of day (0..24) at which the shift ends; may be earlier than the start.
    pub fn end_hour(&self) -> u32 {
        (self.start_hour + self.duration) % 24
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_and_unknown_codes() {
        let b = ShiftTypeSpec::lookup("B").expect("B is configured");
        assert_eq!(b.start_hour, 16);
        assert_eq!(b.time, "4:00 PM - 12:00 AM");
        assert!(ShiftTypeSpec::lookup("Z").is_none());
        assert!(ShiftTypeSpec::lookup("a").is_none());
    }

    #[test]
    fn end_hour_wraps_past_midnight() {
        assert_eq!(ShiftTypeSpec::lookup("B").unwrap().end_hour(), 0);
        assert_eq!(ShiftTypeSpec::lookup("G2").unwrap().end_hour(), 17);
    }

    #[test]
    fn weekly_constants_agree() {
        assert_eq!(SHIFTS_PER_WEEK * HOURS_PER_SHIFT, HOURS_PER_WEEK);
        assert!(SHIFT_TYPES.iter().all(|s| s.duration == HOURS_PER_SHIFT));
        assert_eq!(ShiftTypeSpec::codes().collect::<Vec<_>>(), ["A", "B", "C", "G1", "G2"]);
    }
}
