/// Sample export in the format the dashboard expects.
pub const DEMO_CSV: &str = "\
Representative Name,Representative Email,Score,Writing style (Score),Accuracy (Score),Empathy & Hepfulness (Score),Customer Experience (CX) rating
John Doe,john@company.com,85,3,3,2,4
Jane Smith,jane@company.com,92,3,3,3,5
Mike Johnson,mike@company.com,78,2,3,2,4
";

/// Column names shown in the `demo` command's help text.
pub const EXPECTED_FORMAT: &str = "\
Required:
  Representative Name (or Agent Name, Rep Name, Name)
  Representative Email (or Agent Email, Rep Email, Email), used for team grouping
  Score (or Overall Score, QA Score, Overall QA Score)

Skills (optional; all three replace a missing Score):
  Writing style (Score), Accuracy (Score), Empathy & Helpfulness (Score)

Feedback (optional):
  Writing style (Explanation), Accuracy (Explanation),
  Empathy & Helpfulness (Explanation), Feedback Focus Areas

Customer experience (optional):
  Customer Experience (CX) rating
";
