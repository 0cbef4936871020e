// Prompt constants for the job-market summary.
// The analyst role goes in the system prompt; the task carries the data.

/// System prompt: role, goal and background of the analyst persona.
pub const ANALYST_SYSTEM: &str = "You are a Job Market Analyst. \
    Your goal is to summarize job trends from tabular listing data in a structured \
    bullet-point format. \
    You specialize in analyzing job data and presenting concise, structured insights. \
    Only refer to companies, locations and titles that appear in the data.";

/// Task template. Replace: {csv_data}, {most_common_source}, {most_common_count},
/// {total_jobs}
pub const SUMMARY_TASK_TEMPLATE: &str = r#"Analyze the following job data and provide a structured summary in bullet-point format:
{csv_data}
Include the following sections with specific details, associating each point with the relevant company, location, and job title from the data:
- **Posting Sources**:
  - Group listings by the site they were posted on (the Via column), e.g.
  - LinkedIn:
    - Data Scientist at Example Corp in New York, NY.
  - Out of these, more sources are from {most_common_source} with {most_common_count} out of {total_jobs} job postings.
- **Job Types**:
  - Group listings by job type and list the companies and locations under each.
- **Experience Levels**:
  - Summarize the experience and education requirements, citing example roles, e.g. Data Scientist at Example Corp in Brooklyn, NY.
- **Date Categories**:
  - Describe how recent the postings are (Posted column), citing examples, and call out older postings with their source.
- **Key Locations**:
  - For each location, list the companies hiring there.
- **Top Companies**:
  - List the most prominent companies with an example role and location, e.g. Example Corp (e.g., Data Scientist in New York, NY).
- **Overall Trend**:
  - One or two sentences on demand for these roles in these locations, naming the most active companies."#;

/// Appended to the task so the model knows the shape of a finished answer.
pub const EXPECTED_OUTPUT: &str = "A detailed bullet-point summary with sections for \
    Posting Sources, Job Types, Experience Levels, Date Categories, Key Locations, \
    Top Companies, and Overall Trend, with specific company, location, and job title \
    details from the data.";

