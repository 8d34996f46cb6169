use weather_core::WeatherRecord;

const RULE_WIDTH: usize = 30;

/// Shown when no usable API key was supplied.
pub const MISSING_KEY_MESSAGE: &str = "\
Please replace 'YOUR_API_KEY_HERE' with your actual OpenWeatherMap API key.
Get one at https://openweathermap.org/api, then either pass --api-key,
set OPENWEATHER_API_KEY, or run `weather configure`.";

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Temperature and wind keep a trailing `.0` (`15.0°C`); humidity is a
/// whole percentage in practice and prints without one (`60%`).
pub fn weather_block(city: &str, record: &WeatherRecord) -> String {
    let rule = "-".repeat(RULE_WIDTH);

    format!(
        "\nWeather for {city}:\n\
         {rule}\n\
         Description: {description}\n\
         Temperature: {temp:?}°C\n\
         Humidity:    {humidity}%\n\
         Wind Speed:  {wind:?} m/s\n\
         {rule}\n",
        city = title_case(city),
        description = title_case(&record.description),
        temp = record.temperature_c,
        humidity = record.humidity_pct,
        wind = record.wind_speed_mps,
    )
}
