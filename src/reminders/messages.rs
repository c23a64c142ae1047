//! Reminder titles and bodies.

use crate::domain::{CalendarDate, FlaggedPeriod, Onah, TimeOfDay};

/// Wording switches that never influence timing or identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageStyle {
    pub discreet: bool,
    pub twenty_four_hour: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderText {
    pub title: String,
    pub body: String,
}

pub fn hefsek(style: MessageStyle, sunset: TimeOfDay) -> ReminderText {
    let name = if style.discreet { "H.T." } else { "Hefsek Tahara" };
    ReminderText {
        title: format!("Luach - {name} Reminder"),
        body: format!(
            "A {name} may be possible today before shkiah.\nSunset today is at {}.",
            sunset.display(style.twenty_four_hour)
        ),
    }
}

pub fn morning_check(style: MessageStyle, day_index: u8) -> ReminderText {
    let name = check_name(style);
    ReminderText {
        title: format!("Luach - {name} Reminder"),
        body: format!(
            "Today is the {} day of the {}.\nThis is a reminder to do the morning {name}.",
            ordinal(u32::from(day_index) + 1),
            clean_days_name(style)
        ),
    }
}

pub fn afternoon_check(style: MessageStyle, day_index: u8, sunset: TimeOfDay) -> ReminderText {
    let name = check_name(style);
    ReminderText {
        title: format!("Luach - {name} Reminder"),
        body: format!(
            "Today is the {} day of the {}.\nThis is a reminder to do the afternoon {name}.\nSunset is at {}.",
            ordinal(u32::from(day_index) + 1),
            clean_days_name(style),
            sunset.display(style.twenty_four_hour)
        ),
    }
}

pub fn immersion(style: MessageStyle, sunset: TimeOfDay) -> ReminderText {
    let (name, verb) = if style.discreet {
        ("M.", "about")
    } else {
        ("Mikvah", "to go to")
    };
    ReminderText {
        title: format!("Luach - {name} Reminder"),
        body: format!(
            "This is a reminder {verb} the {name} tonight.\nSunset is at {}.",
            sunset.display(style.twenty_four_hour)
        ),
    }
}

/// `anchor` is sunrise for a daytime onah and sunset for a nighttime one.
pub fn flagged_period(
    style: MessageStyle,
    period: &FlaggedPeriod,
    anchor: TimeOfDay,
) -> ReminderText {
    let (title, anchor_label) = match period.onah {
        Onah::Day => ("Luach - Daytime flagged date notification", "Sunrise"),
        Onah::Night => ("Luach - Nighttime flagged date notification", "Sunset"),
    };
    let summary = if style.discreet {
        discreet_period_summary(period.onah, &period.date)
    } else {
        period.description.clone()
    };
    ReminderText {
        title: title.to_string(),
        body: format!(
            "{summary}\n{anchor_label} is at {}",
            anchor.display(style.twenty_four_hour)
        ),
    }
}

fn discreet_period_summary(onah: Onah, date: &CalendarDate) -> String {
    format!("The {} of {date} needs to be observed.", onah.label())
}

fn check_name(style: MessageStyle) -> &'static str {
    if style.discreet {
        "B."
    } else {
        "Bedikah"
    }
}

fn clean_days_name(style: MessageStyle) -> &'static str {
    if style.discreet {
        "7"
    } else {
        "Shiva Neki'im"
    }
}

/// `1st`, `2nd`, `3rd`, `4th` ... with the teens always taking `th`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
