/// Built-in facts shown while an upload is being processed.
pub const DEFAULT_FACTS: [&str; 14] = [
    "Data scientists spend up to 80% of their time cleaning and preparing data.",
    "Duplicate rows are one of the most common defects in exported spreadsheets.",
    "Filling numeric gaps with the column mean keeps the overall average unchanged.",
    "Skewed columns are often better imputed with the median than the mean.",
    "Trailing whitespace can make two identical labels look like different categories.",
    "Phone numbers are easier to match once every digit group follows one format.",
    "A CSV file has no types: every value is text until someone parses it.",
    "Leading zeros in IDs disappear the moment a column is read as a number.",
    "Excel stores dates as serial numbers counted from the year 1900.",
    "Consistent column names make joining several tables far less error prone.",
    "Outliers are not always errors; sometimes they are the most interesting rows.",
    "Encoding mix-ups are why accented names sometimes turn into strange symbols.",
    "Validating data at the source is cheaper than repairing it downstream.",
    "Clean data makes models quicker to train and easier to explain.",
];

pub fn default_facts() -> Vec<String> {
    DEFAULT_FACTS.iter().map(|fact| fact.to_string()).collect()
}
