use crate::cities::REGION;
use crate::models::Category;

pub fn build_prompt(city_name: &str) -> String {
    let categories = Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Find 6-10 current and upcoming real events in {city}, {region} happening soon (this month or next).\n\
Use Google Search to find accurate information. Prefer real, verifiable events over invented ones.\n\
\n\
Return the result ONLY as a valid JSON array of objects. Do not include any conversational text outside the JSON.\n\
\n\
Each object must strictly follow this schema:\n\
{{\n\
  \"id\": \"unique_string_id\",\n\
  \"title\": \"Event Name\",\n\
  \"date\": \"YYYY-MM-DD or readable string like 'Oct 12, 2023'\",\n\
  \"time\": \"Event time e.g. 7:00 PM\",\n\
  \"location\": \"Specific venue name\",\n\
  \"city\": \"{city}\",\n\
  \"description\": \"A brief 2-sentence description of the event.\",\n\
  \"category\": \"One of: {categories}\",\n\
  \"requirements\": [\"List specific requirements to join, e.g. 'Ticket: 1000 KES', '18+ only', 'RSVP required', 'Smart Casual'\"],\n\
  \"sourceUrl\": \"URL to the event page if found, otherwise null\"\n\
}}\n\
\n\
If you cannot find real events, you may infer highly plausible recurring events for this city \
(e.g. weekly markets, club nights) but prefer real specific events.\n",
        city = city_name,
        region = REGION,
        categories = categories,
    )
}
