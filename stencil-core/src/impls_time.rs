use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Buffer, EncodeJson};

/// Quoted RFC 3339, or `null` for a date RFC 3339 cannot express.
impl EncodeJson for OffsetDateTime {
    fn encode_json(&self, out: &mut Buffer) {
        let mark = out.len();
        out.push(b'"');
        match self.format_into(out, &Rfc3339) {
            Ok(_) => out.push(b'"'),
            Err(_) => {
                out.truncate(mark);
                out.extend(b"null");
            }
        }
    }
}

crate::opaque!(OffsetDateTime);
