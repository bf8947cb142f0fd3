//! Representative count derived from the OpenTelemetry `ot` trace state
//! entry, e.g. `ot=p:8;r:62` yields `2^8`.
use crate::Error;
use opentelemetry::otel_debug;

const OT_VENDOR_KEY: &str = "ot";
const P_VALUE_KEY: &str = "p";
const MAX_P_VALUE: u32 = 63;

/// Inverse sampling probability encoded in `trace_state`.
///
/// Missing or malformed p-values yield `1`.
pub(crate) fn representative_count(trace_state: &str) -> f64 {
    match p_value(trace_state) {
        Ok(Some(p)) => 2f64.powi(p as i32),
        Ok(None) => 1.0,
        Err(err) => {
            otel_debug!(
                name: "Enrichment.TraceState.InvalidPValue",
                trace_state = trace_state,
                reason = err.to_string(),
            );
            1.0
        }
    }
}

fn p_value(trace_state: &str) -> Result<Option<u32>, Error> {
    let Some(ot) = entry(trace_state, OT_VENDOR_KEY, ',', '=') else {
        return Ok(None);
    };
    let Some(raw) = entry(ot, P_VALUE_KEY, ';', ':') else {
        return Ok(None);
    };
    let p: u32 = raw
        .parse()
        .map_err(|_| Error::InvalidTraceState(format!("{OT_VENDOR_KEY}={ot}")))?;
    if p > MAX_P_VALUE {
        return Err(Error::PValueOutOfRange(p));
    }
    Ok(Some(p))
}

/// Value of the first `key<assign>value` member of a `sep` separated list.
fn entry<'a>(list: &'a str, key: &str, sep: char, assign: char) -> Option<&'a str> {
    list.split(sep).map(str::trim).find_map(|member| {
        let (k, v) = member.split_once(assign)?;
        (k == key).then_some(v)
    })
}
