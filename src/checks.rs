//! Payout preconditions for a closed issue: field extraction checks,
//! label/assignee cardinality, and the hourly-vs-bonus payout rule.

use crate::client::GithubClient;
use crate::error::Result;
use crate::extract;
use crate::report::CheckReport;
use crate::types::Issue;

/// The computed payout for an issue. `final_price >= hourly_price`
/// always holds: the bonus only applies when it beats the hourly
/// computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payout {
    pub hourly_price: i64,
    pub bonus_price: i64,
    pub final_price: i64,
}

pub fn compute_payout(time: f64, rate: f64, bonus_price: f64) -> Payout {
    let hourly_price = (time * rate).round() as i64;
    let bonus_price = bonus_price as i64;

    Payout {
        hourly_price,
        bonus_price,
        final_price: hourly_price.max(bonus_price),
    }
}

/// The planned outcome of the payout check: the messages to report and,
/// when the recorded title price disagrees with the final price, the
/// rewritten title to submit.
#[derive(Debug)]
pub struct PayoutPlan {
    pub messages: Vec<String>,
    pub update: Option<TitleUpdate>,
}

#[derive(Debug, PartialEq)]
pub struct TitleUpdate {
    pub new_title: String,
    pub old_price: i64,
    pub new_price: i64,
}

/// Decide the final price and whether the title needs correcting. The
/// title is patched whenever the recorded price differs from the final
/// price, in either direction.
pub fn plan_payout(issue: &Issue, rate: f64) -> Result<PayoutPlan> {
    let title_price = extract::extract_title_price(&issue.title)? as i64;
    let bonus = extract::extract_expected_price(&issue.body)?;
    let time = extract::extract_time(&issue.body)?;
    let payout = compute_payout(time, rate, bonus);

    let mut messages = Vec::new();
    if payout.hourly_price < payout.bonus_price {
        messages.push(format!(
            "Issue completed with bonus. Bonus price: ${}, but completed in {time:.2} hours. Bonus amount: ${}",
            payout.bonus_price,
            payout.bonus_price - payout.hourly_price,
        ));
    } else {
        messages.push(format!(
            "Issue completed without bonus. Total price: {time:.2} hours * ${rate} = ${}",
            payout.hourly_price,
        ));
    }

    let update = (title_price != payout.final_price).then(|| TitleUpdate {
        new_title: extract::rewrite_title_price(&issue.title, payout.final_price as f64),
        old_price: title_price,
        new_price: payout.final_price,
    });

    Ok(PayoutPlan { messages, update })
}

pub fn check_time(issue: &Issue, report: &mut CheckReport) -> bool {
    match extract::extract_time(&issue.body) {
        Ok(time) => {
            report.pass(format!("Time spent on issue: {time:.2} hours"));
            true
        }
        Err(e) => {
            report.fail(e.to_string());
            false
        }
    }
}

pub fn check_expected_price(issue: &Issue, report: &mut CheckReport) -> bool {
    match extract::extract_expected_price(&issue.body) {
        Ok(price) => {
            report.pass(format!("Expected/bonus price: ${}", price as i64));
            true
        }
        Err(e) => {
            report.fail(e.to_string());
            false
        }
    }
}

/// Exactly one `charge-to-` label identifies the budget to bill.
pub fn check_charge_labels(issue: &Issue, report: &mut CheckReport) -> bool {
    let charge_labels = issue.charge_labels();

    match charge_labels.len() {
        1 => {
            report.pass(format!("Charge label found: {}", charge_labels[0]));
            true
        }
        0 => {
            report.fail(format!(
                "No charge label found: had {} labels.",
                issue.labels.len()
            ));
            false
        }
        _ => {
            report.fail(format!("Multiple charge labels found: {charge_labels:?}"));
            false
        }
    }
}

pub fn check_assignee(issue: &Issue, report: &mut CheckReport) -> bool {
    match issue.assignees.len() {
        1 => {
            report.pass(format!("Assignee found: {}", issue.assignees[0]));
            true
        }
        0 => {
            report.fail("No assignee found.");
            false
        }
        _ => {
            report.fail(format!("Multiple assignees found: {:?}", issue.assignees));
            false
        }
    }
}

/// Run every check, accumulating all messages before deciding. The
/// payout step only runs when both of its inputs extracted; a failed
/// title PATCH is a logged warning, not a check failure.
pub async fn run_all(
    client: &GithubClient,
    issue: &Issue,
    rate: f64,
    report: &mut CheckReport,
) -> bool {
    let time_ok = check_time(issue, report);
    let bonus_ok = check_expected_price(issue, report);
    let labels_ok = check_charge_labels(issue, report);
    let assignee_ok = check_assignee(issue, report);

    let mut payout_ok = true;
    if time_ok && bonus_ok {
        payout_ok = match plan_payout(issue, rate) {
            Ok(plan) => {
                for message in plan.messages {
                    report.pass(message);
                }

                if let Some(update) = plan.update {
                    println!("Updating issue title to: {}", update.new_title);
                    match client
                        .update_issue_title(&issue.repo, issue.number, &update.new_title)
                        .await
                    {
                        Ok(()) => report.pass(format!(
                            "Updated issue title from ${} to ${}",
                            update.old_price, update.new_price
                        )),
                        Err(e) => eprintln!("Failed to update issue title: {e}"),
                    }
                }
                true
            }
            Err(e) => {
                report.fail(e.to_string());
                false
            }
        };
    }

    time_ok && bonus_ok && labels_ok && assignee_ok && payout_ok
}
