//! Google Takeout style subscriptions.csv.
//!
//! Fields are quoted only when they contain a delimiter, a quote or a line
//! break; rows end with CRLF like every other csv writer google reads.

use crate::channel::Channel;
use crate::util::takeout_channel_url;

pub const HEADER: [&str; 3] = ["Channel Id", "Channel Url", "Channel Title"];

pub fn render(channels: &[Channel]) -> String {
    let mut output = String::new();
    push_row(&mut output, &HEADER);

    for channel in channels {
        let url = takeout_channel_url(&channel.id);
        push_row(&mut output, &[&channel.id, &url, &channel.name]);
    }

    output
}

fn push_row(output: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        push_field(output, field);
    }
    output.push_str("\r\n");
}

fn push_field(output: &mut String, field: &str) {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        output.push('"');
        output.push_str(&field.replace('"', "\"\""));
        output.push('"');
    } else {
        output.push_str(field);
    }
}
