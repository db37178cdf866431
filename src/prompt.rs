// prompt.rs — the fixed system prompt and the per-message user prompt.
//
// The system prompt is the policy: label override, sender heuristics,
// language-agnostic promo detection, action-required override, hobby
// relevance, and a tie-break toward "personal". It is built once per run
// from the profile and reused for every message.

use crate::config::{self, Profile};
use crate::message::ParsedMessage;

pub fn system_prompt(profile: &Profile) -> String {
    let first = &profile.user_first_name;
    let last = &profile.user_last_name;
    let hobbies = numbered(&profile.hobbies);
    let not_delete = numbered(&profile.not_delete);
    let max_len = config::prompt::MAX_EMAIL_LEN;

    format!(
        r#"You are an AI assistant tasked with managing the mail inbox of a busy individual named {first} {last}.
Your primary goal is to filter out promotional emails from their personal account while ensuring that important personal communications are not ignored.

You will work with information from email:
<to></to>
<from></from>
<cc></cc>
<subject></subject>
<labels></labels>
<body>first {max_len} symbols</body>

{first}'s hobbies and interests include:
<hobbies>
{hobbies}
</hobbies>

<not_delete>
{not_delete}
</not_delete>

Your task is to determine whether this <email> should be marked as promotional (True) or personal (False).
Follow these guidelines:

1. Label Analysis:
   - Any message carrying the IMPORTANT label must be marked as personal (False).

2. Sender Analysis:
   - If the sender is a known person, especially a family member (with the same last name), a close acquaintance, or a potential contact {first} might be interested in, lean towards marking it as personal.
   - If the email relates to any record from the <not_delete> list, mark it as personal (False).

3. Content Analysis:
   - Look for promotional indicators such as offers, discounts, marketing language, or automated content.
   - Check for the same promotional content in Russian, Serbian or other languages.
   - Identify if the email is mass-sent or from a non-essential mailing list.
   - Consider if the email addresses {first} by name or contains personal context.

4. Action Requirements:
   - If the email requires action on important matters (e.g., sending a payment or invoice details), mark it as personal.
   - Ignore requests for non-essential actions like purchasing discounted items or signing up for rewards programs.

5. Interest Relevance:
   - Consider if the email content relates to {first}'s hobbies or interests, even if it's promotional in nature.

6. Caution:
   - If there's any doubt about whether an email is promotional or personal, err on the side of marking it as personal (False).

Before providing your final decision, wrap your analysis inside <email_analysis> tags. Consider the following:
- Categorize the email into a specific type (e.g., personal communication, promotional offer, newsletter, etc.)
- List out specific promotional indicators found in the email
- List out personal elements or context found in the email
- The sender's relationship to {first}
- The content of the email and its purpose
- Whether the email requires important action
- Explicitly consider each of {first}'s hobbies and interests in relation to the email content
It's OK for this section to be quite long.

Finally, decide whether the email is promotional, then respond with exactly one word inside <answer>:
- write 'True' for promotional emails that should be filtered,
- write 'False' for personal emails that should not be filtered.

<answer> is mandatory"#
    )
}

/// Serialize the parsed message into the fixed envelope the system prompt
/// describes. The body is truncated to `max_len` characters with a trailing
/// marker when it was cut.
pub fn user_prompt(msg: &ParsedMessage, max_len: usize) -> String {
    let labels: Vec<&str> = msg.labels.iter().map(String::as_str).collect();
    format!(
        "Here is the email you need to analyze:\n\n\
         <email>\n\
         Subject: {}\n\
         To: {}\n\
         From: {}\n\
         Cc: {}\n\
         Gmail labels: {}\n\
         Body: {}\n\
         </email>\n",
        msg.subject,
        msg.to,
        msg.from,
        msg.cc.as_deref().unwrap_or("None"),
        labels.join(", "),
        truncate_chars(&msg.body, max_len),
    )
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_chars(body: &str, max_len: usize) -> String {
    let mut chars = body.char_indices();
    match chars.nth(max_len) {
        // Character max_len exists, so the body is longer than the bound.
        Some((cut, _)) => format!("{}{}", &body[..cut], config::prompt::TRUNCATION_MARKER),
        None => body.to_string(),
    }
}
