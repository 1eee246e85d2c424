use anyhow::{Result, anyhow};

/// Converts seconds to whole milliseconds, rounding to nearest.
pub fn seconds_to_ms(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

pub fn format_srt_timestamp(ms: i64) -> String {
    format_timestamp(ms, ',')
}

/// `HH:MM:SS.mmm`, shared by VTT cues and Markdown lines.
pub fn format_vtt_timestamp(ms: i64) -> String {
    format_timestamp(ms, '.')
}

fn format_timestamp(ms_in: i64, ms_sep: char) -> String {
    let ms = ms_in.max(0);

    let total_seconds = ms / 1000;
    let milli = ms % 1000;

    let sec = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let min = total_minutes % 60;
    let hour = total_minutes / 60;

    format!("{hour:02}:{min:02}:{sec:02}{ms_sep}{milli:03}")
}

/// Parses plain seconds (`12.5`) or a clock timestamp (`00:00:12,500`,
/// `00:00:12.500`, `00:12.5`) into milliseconds.
pub fn parse_time_to_ms(s: &str) -> Result<i64> {
    let t = s.trim();

    if let Ok(v) = t.parse::<f64>() {
        if !v.is_finite() {
            return Err(anyhow!("unrecognized timestamp: '{t}'"));
        }
        return Ok(seconds_to_ms(v));
    }

    let (hms, milli) = if let Some((a, b)) = t.split_once(',') {
        (a, Some(b))
    } else if let Some((a, b)) = t.rsplit_once('.') {
        (a, Some(b))
    } else {
        (t, None)
    };

    let parts: Vec<&str> = hms.split(':').collect();
    let (h, m, s2) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => ("0", *m, *s),
        _ => return Err(anyhow!("unrecognized timestamp: '{t}'")),
    };

    let h: i64 = h.parse().map_err(|_| anyhow!("bad hours: '{t}'"))?;
    let m: i64 = m.parse().map_err(|_| anyhow!("bad minutes: '{t}'"))?;
    let s2: i64 = s2.parse().map_err(|_| anyhow!("bad seconds: '{t}'"))?;

    let mut ms = ((h * 60 + m) * 60 + s2) * 1000;

    if let Some(frac) = milli {
        let mut frac_s = frac.trim().to_string();
        frac_s.truncate(3);
        while frac_s.len() < 3 {
            frac_s.push('0');
        }
        let milli: i64 = frac_s
            .parse()
            .map_err(|_| anyhow!("bad milliseconds: '{t}'"))?;
        ms += milli;
    }

    Ok(ms)
}
