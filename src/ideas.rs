use crate::reason;
use crate::{Focus, Metrics};

pub fn default_recommendation(focus: Focus) -> String {
    match focus {
        Focus::Conversion => {
            "Optimize CONVERSION: show a real result or a short comparison and close with one clear next step."
        }
        Focus::Retention => {
            "Improve RETENTION: hook in the first two seconds, one idea per piece, fast pacing and cuts."
        }
        Focus::Discovery => {
            "Boost DISCOVERY: a strong thumbnail and hook with an explicit promise."
        }
    }
    .to_string()
}

// Static reason used when generation fails outright: the composed heuristic
// paragraph plus the four action bullets the validator expects.
pub fn fallback_reason(focus: Focus, metrics: &Metrics) -> String {
    let bullets: [&str; 4] = match focus {
        Focus::Conversion => [
            "- Show one real case with its before and after.",
            "- Answer the two objections you hear most often.",
            "- Keep the promise consistent from hook to landing.",
            "- End with a single clear next step.",
        ],
        Focus::Retention => [
            "- Hook in the first two seconds with the end result.",
            "- Keep one idea per piece and cut anything that does not serve it.",
            "- Add a cut or visual change every two to three seconds.",
            "- Close with a question that sets up the next piece.",
        ],
        Focus::Discovery => [
            "- Lead the title with the promised outcome and a concrete number.",
            "- Build the thumbnail around one readable word and one subject.",
            "- Open on the strongest visual proof instead of an introduction.",
            "- Write titles around searches your audience actually types.",
        ],
    };

    let mut out = reason::compose_reason(focus, metrics);
    out.push('\n');
    for bullet in bullets {
        out.push('\n');
        out.push_str(bullet);
    }
    out
}

pub fn fallback_ideas(focus: Focus, niche: &str) -> Vec<String> {
    let n = {
        let trimmed = niche.trim();
        if trimmed.is_empty() {
            "your niche".to_string()
        } else {
            trimmed.to_string()
        }
    };

    let templates: Vec<String> = match focus {
        Focus::Conversion => vec![
            format!("{}: a real case, before and after in 30 days", n),
            format!("{}: 3 objections and the honest answer", n),
            format!("{}: what you get and who it is not for", n),
            format!("{}: method A vs method B compared", n),
            format!("{}: social proof in 45 seconds", n),
            format!("{}: a quick way to decide today", n),
            format!("{}: mistakes that stall results", n),
            format!("{}: what to check before you commit", n),
            format!("{}: typical results and timelines", n),
            format!("{}: frequent doubts answered in 60 seconds", n),
        ],
        Focus::Retention => vec![
            format!("{}: 3 mistakes and how to avoid them", n),
            format!("Mini lesson in {}: from 0 to 1", n),
            format!("{}: a 60-second routine worth saving", n),
            format!("{}: myths vs reality", n),
            format!("{}: a quick progress test", n),
            format!("Hook plus one idea: {} basics", n),
            format!("{}: the 7-day challenge", n),
            format!("{}: one pro move in a minute", n),
            format!("{}: before and after, explained", n),
            format!("{}: quick questions, straight answers", n),
        ],
        Focus::Discovery => vec![
            format!("{}: a simple roadmap", n),
            format!("Why {}: the real benefits", n),
            format!("{} in 3 steps for beginners", n),
            format!("Essential tools for {}", n),
            format!("Typical mistakes when starting {}", n),
            format!("{}: a framework to decide", n),
            format!("Your first week of {}: what to expect", n),
            format!("{}: the technique with the most impact", n),
            format!("{}: signs of real progress", n),
            format!("{}: avoid this if you start today", n),
        ],
    };

    templates
}
