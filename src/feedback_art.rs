/// Shown next to "Correct!"
pub const CORRECT_ART: &[&str] = &[
    r"   _____                          _   _ ",
    r"  / ____|                        | | | |",
    r" | |     ___  _ __ _ __ ___  ___| |_| |",
    r" | |    / _ \| '__| '__/ _ \/ __| __| |",
    r" | |___| (_) | |  | | |  __/ (__| |_|_|",
    r"  \_____\___/|_|  |_|  \___|\___|\__(_)",
];

/// Shown next to the list of accepted answers
pub const INCORRECT_ART: &[&str] = &[
    r"  _   _                      ",
    r" | \ | |  ___   _ __   ___  ",
    r" |  \| | / _ \ | '_ \ / _ \ ",
    r" | |\  || (_) || |_) |  __/ ",
    r" |_| \_| \___/ | .__/ \___| ",
    r"               |_|          ",
];

pub fn art_for(correct: bool) -> &'static [&'static str] {
    if correct {
        CORRECT_ART
    } else {
        INCORRECT_ART
    }
}

/// Widest line, for centering
pub fn art_width(art: &[&str]) -> usize {
    art.iter().map(|line| line.chars().count()).max().unwrap_or(0)
}
