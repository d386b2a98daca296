//! Built-in English forbidden wording lists and rewrite suggestions

/// Category names of the built-in dictionary, in scan order
pub const ASSURANCE: &str = "Assurance Wording";
pub const CONCLUSIONS: &str = "Conclusive Wording";
pub const NEGATIVE_ASSURANCE: &str = "Negative Assurance";
pub const TECHNICAL: &str = "Technical Wording";
pub const ABSOLUTES: &str = "Absolutes";
pub const TAX: &str = "Tax Document Wording";

/// Words that promise a level of certainty the report cannot give
pub const ASSURANCE_TERMS: &[&str] = &[
    "assure",
    "assurance",
    "assured",
    "assures",
    "assuring",
    "certify",
    "certified",
    "certifies",
    "certifying",
    "guarantee",
    "guaranteed",
    "guarantees",
    "guaranteeing",
    "validate",
    "validated",
    "validates",
    "validating",
    "verify",
    "verified",
    "verifies",
    "verifying",
    "confirm",
    "confirmed",
    "confirms",
    "confirming",
    "ensure",
    "insure",
    "warrant",
    "attest",
];

pub const ASSURANCE_SUGGESTIONS: &[(&str, &str)] = &[
    ("assure", "Consider using 'observed', 'noted', or 'identified' instead."),
    ("certify", "Consider using 'reviewed', 'examined', or 'analyzed' instead."),
    ("guarantee", "Consider using 'support', 'assist', or 'help' instead."),
    ("validate", "Consider using 'observed', 'noted', or 'identified' instead."),
    ("verify", "Consider using 'reviewed', 'examined', or 'analyzed' instead."),
    ("confirm", "Consider using 'observed', 'noted', or 'identified' instead."),
];

pub const ASSURANCE_DEFAULT: &str = "Use \"expect\" or \"aim to\" instead of guarantee terms.";
pub const ASSURANCE_EXPLANATION: &str =
    "Guarantee terms create an impression of certainty that is not appropriate.";

/// Phrases that read as a formal conclusion or opinion
pub const CONCLUSION_TERMS: &[&str] = &[
    "we conclude",
    "we are of the opinion",
    "in our opinion",
    "we find",
    "we found",
    "we have determined",
    "we believe",
    "you comply with",
];

pub const CONCLUSIONS_DEFAULT: &str = "Avoid conclusive statements, use factual observations.";
pub const CONCLUSIONS_EXPLANATION: &str = "Conclusive statements can create legal obligations.";

/// Negative assurance formulations
pub const NEGATIVE_ASSURANCE_TERMS: &[&str] = &[
    "nothing has come to our attention that causes us to believe",
    "nothing we reviewed indicated",
    "we have no reason to believe",
];

pub const NEGATIVE_ASSURANCE_DEFAULT: &str = "Avoid negative assurance formulations.";
pub const NEGATIVE_ASSURANCE_EXPLANATION: &str =
    "Negative assurance formulations can be misinterpreted.";

/// Terms reserved for formal engagements
pub const TECHNICAL_TERMS: &[&str] = &["audit", "review", "compile"];

pub const TECHNICAL_DEFAULT: &str = "Use neutral terms like \"examine\" or \"analyze\".";
pub const TECHNICAL_EXPLANATION: &str = "Technical terms can create specific expectations.";

pub const ABSOLUTE_TERMS: &[&str] = &["always", "never", "all", "none", "complete", "entire"];

pub const ABSOLUTES_DEFAULT: &str = "Avoid absolute terms, use relative formulations.";
pub const ABSOLUTES_EXPLANATION: &str = "Absolute terms are rarely accurate and can be misleading.";

/// Tax terminology that must not appear outside tax engagements
pub const TAX_TERMS: &[&str] = &[
    "tax",
    "taxes",
    "taxation",
    "taxable",
    "taxing",
    "fiscal",
    "fiscally",
    "revenue",
    "revenues",
    "duty",
    "duties",
    "levy",
    "levies",
    "levied",
    "levying",
];

pub const TAX_EXPLANATION: &str =
    "Tax terminology suggests a tax engagement the report does not cover.";

pub const TAX_SUGGESTIONS: &[(&str, &str)] = &[
    ("tax", "Consider using 'financial', 'monetary', or 'economic' instead."),
    ("fiscal", "Consider using 'financial', 'monetary', or 'economic' instead."),
    ("revenue", "Consider using 'income', 'earnings', or 'proceeds' instead."),
    ("duty", "Consider using 'responsibility', 'obligation', or 'requirement' instead."),
    ("levy", "Consider using 'impose', 'apply', or 'implement' instead."),
];
