//! Page icon inference
//!
//! Picks a single emoji for the page from the opening of the note body.
//! Keyword matches win over the day-counter fallback; among keyword matches
//! the longest keyword wins, with ties broken by table declaration order.
//! Purely cosmetic, so every path ends in a usable default.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants as C;

/// Keyword → emoji table, scanned against the excerpt as substrings.
/// Declaration order is the tie-break for equal-length matches.
const KEYWORD_ICONS: &[(&str, &str)] = &[
    // morning study
    ("朝勉", "🌅"),
    ("勉強", "📚"),
    ("学習", "📝"),
    ("勤続", "🔄"),
    ("早起き", "🌄"),
    ("朝活", "☀️"),
    // time
    ("時間", "⏰"),
    ("スケジュール", "📅"),
    ("予定", "📆"),
    ("締め切り", "⏳"),
    ("期限", "⌛"),
    // feelings
    ("嬉しい", "😊"),
    ("楽しい", "😄"),
    ("悲しい", "😢"),
    ("辛い", "😣"),
    ("疲れ", "😩"),
    ("頑張", "💪"),
    ("がんば", "💪"),
    // places
    ("家", "🏠"),
    ("実家", "🏡"),
    ("学校", "🏫"),
    ("会社", "🏢"),
    ("カフェ", "☕"),
    // meals
    ("食事", "🍽️"),
    ("朝食", "🍳"),
    ("昼食", "🍱"),
    ("夕食", "🍲"),
    ("コーヒー", "☕"),
    ("お茶", "🍵"),
    // weather
    ("晴れ", "☀️"),
    ("雨", "🌧️"),
    ("雪", "❄️"),
    ("曇り", "☁️"),
    ("台風", "🌀"),
    ("寒い", "🥶"),
    ("暑い", "🥵"),
    // seasons
    ("春", "🌸"),
    ("夏", "🌞"),
    ("秋", "🍂"),
    ("冬", "⛄"),
    ("正月", "🎍"),
    // events
    ("誕生日", "🎂"),
    ("クリスマス", "🎄"),
    ("旅行", "✈️"),
    ("旅", "🧳"),
    ("休暇", "🏖️"),
    ("休日", "🛌"),
    // work
    ("仕事", "💼"),
    ("会議", "🗣️"),
    ("メール", "📧"),
    ("電話", "📞"),
    // health
    ("健康", "🏥"),
    ("運動", "🏃"),
    ("ジム", "🏋️"),
    ("散歩", "🚶"),
    ("睡眠", "😴"),
    // hobbies
    ("読書", "📖"),
    ("映画", "🎬"),
    ("音楽", "🎵"),
    ("ゲーム", "🎮"),
    ("料理", "👨‍🍳"),
    ("写真", "📷"),
    // transport
    ("電車", "🚆"),
    ("自転車", "🚲"),
    // people
    ("友達", "👫"),
    ("家族", "👨‍👩‍👧‍👦"),
    // technology
    ("パソコン", "💻"),
    ("スマホ", "📱"),
    ("プログラミング", "👨‍💻"),
    // misc
    ("アイデア", "💡"),
    ("メモ", "📝"),
    ("計画", "📋"),
    ("目標", "🎯"),
    ("成功", "🏆"),
    ("失敗", "😓"),
    ("重要", "⚠️"),
    ("買い物", "🛒"),
];

/// Keycap emoji for the trailing digit of the day counter (1..=9).
const DIGIT_ICONS: [&str; 9] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣"];

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C::IMAGE_PATTERN).unwrap());
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C::HASHTAG_PATTERN).unwrap());
static COUNTER_PHRASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(C::COUNTER_PHRASE_PATTERN).unwrap());
static DAY_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(C::DAY_COUNT_PATTERN).unwrap());

/// Infer the page icon from the note body and derived title.
pub fn predict_icon(content: &str, title: &str) -> &'static str {
    let excerpt = icon_excerpt(content);

    let mut best: Option<(&str, &str)> = None;
    for &(keyword, emoji) in KEYWORD_ICONS {
        if excerpt.contains(keyword) {
            let longer = best.map_or(true, |(current, _)| {
                keyword.chars().count() > current.chars().count()
            });
            if longer {
                best = Some((keyword, emoji));
            }
        }
    }
    if let Some((_, emoji)) = best {
        return emoji;
    }

    if let Some(caps) = DAY_COUNT_RE.captures(title) {
        if let Ok(day) = caps[1].parse::<u32>() {
            if day % 100 == 0 {
                return "🎉";
            }
            if day % 50 == 0 {
                return "🎊";
            }
            if day % 10 == 0 {
                return "🔟";
            }
            return DIGIT_ICONS[(day % 10) as usize - 1];
        }
    }

    C::DEFAULT_ICON
}

/// Plain-text excerpt used for the keyword scan: images, hashtag tokens and
/// the counter phrase are removed, then the first
/// [`C::ICON_EXCERPT_LENGTH`] characters are kept.
fn icon_excerpt(content: &str) -> String {
    let text = IMAGE_RE.replace_all(content, "");
    let text = HASHTAG_RE.replace_all(&text, "");
    let text = COUNTER_PHRASE_RE.replace_all(&text, "");
    text.trim().chars().take(C::ICON_EXCERPT_LENGTH).collect()
}
