use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{NewTeam, NewTeamMember, PaymentStatus, ProjectDetails, TeacherVerification, TeamRecord};

/// Inserts a new team row. The payment status starts as `completed` only when the caller has already verified a
/// payment for the registration; otherwise it starts `pending` and the webhook settles it later.
pub async fn insert_team(team: &NewTeam, paid: bool, conn: &mut SqliteConnection) -> Result<TeamRecord, sqlx::Error> {
    let status = if paid { PaymentStatus::Completed } else { PaymentStatus::Pending };
    let team = sqlx::query_as(
        r#"
            INSERT INTO teams (team_name, school_name, school_district, lead_phone, lead_email, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(&team.team_name)
    .bind(&team.school_name)
    .bind(&team.school_district)
    .bind(&team.lead_phone)
    .bind(&team.lead_email)
    .bind(status)
    .fetch_one(conn)
    .await?;
    Ok(team)
}

/// Derives a human-friendly team code from the school district and the team's row id, e.g. `GEN201-KTM-000042`.
pub fn team_code_for(district: &str, team_id: i64) -> String {
    let prefix: String = district.chars().filter(|c| c.is_ascii_alphabetic()).take(3).collect::<String>().to_uppercase();
    let prefix = if prefix.is_empty() { "GEN".to_string() } else { prefix };
    format!("GEN201-{prefix}-{team_id:06}")
}

pub async fn set_team_code(team_id: i64, code: &str, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE teams SET team_code = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(code)
        .bind(team_id)
        .execute(conn)
        .await?;
    trace!("🗃️ Team #{team_id} assigned code {code}");
    Ok(())
}

pub async fn insert_member(
    team_id: i64,
    member: &NewTeamMember,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO team_members (team_id, name, gender, grade, phone, email, food_preference, is_team_lead)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8);
        "#,
    )
    .bind(team_id)
    .bind(&member.name)
    .bind(&member.gender)
    .bind(&member.grade)
    .bind(&member.phone)
    .bind(&member.email)
    .bind(&member.food_preference)
    .bind(member.is_team_lead)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_project_details(
    team_id: i64,
    project: &ProjectDetails,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO project_details (
                team_id, idea_title, problem_statement, solution_idea, implementation_plan, beneficiaries,
                teamwork_contribution
            ) VALUES ($1, $2, $3, $4, $5, $6, $7);
        "#,
    )
    .bind(team_id)
    .bind(&project.idea_title)
    .bind(&project.problem_statement)
    .bind(&project.solution_idea)
    .bind(&project.implementation_plan)
    .bind(&project.beneficiaries)
    .bind(&project.teamwork_contribution)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_teacher_verification(
    team_id: i64,
    teacher: &TeacherVerification,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO teacher_verifications (team_id, salutation, teacher_name, teacher_phone)
            VALUES ($1, $2, $3, $4);
        "#,
    )
    .bind(team_id)
    .bind(&teacher.salutation)
    .bind(&teacher.teacher_name)
    .bind(&teacher.teacher_phone)
    .execute(conn)
    .await?;
    Ok(())
}

/// Removes the team and every child row attached to it. Used as the compensating action when a registration write
/// fails partway; each table is deleted explicitly rather than relying on cascade pragmas being enabled.
pub async fn delete_team(team_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM team_members WHERE team_id = $1").bind(team_id).execute(&mut *conn).await?;
    sqlx::query("DELETE FROM project_details WHERE team_id = $1").bind(team_id).execute(&mut *conn).await?;
    sqlx::query("DELETE FROM teacher_verifications WHERE team_id = $1").bind(team_id).execute(&mut *conn).await?;
    sqlx::query("DELETE FROM teams WHERE id = $1").bind(team_id).execute(&mut *conn).await?;
    debug!("🗃️ Team #{team_id} and its child records removed");
    Ok(())
}

/// Marks the team as paid. A no-op for teams that are already completed, so replayed webhook deliveries do not
/// churn the row. Returns `true` if the row changed.
pub async fn mark_team_paid(team_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE teams SET payment_status = 'completed', updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND payment_status <> 'completed';
        "#,
    )
    .bind(team_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_team(team_id: i64, conn: &mut SqliteConnection) -> Result<Option<TeamRecord>, sqlx::Error> {
    let team = sqlx::query_as("SELECT * FROM teams WHERE id = $1").bind(team_id).fetch_optional(conn).await?;
    Ok(team)
}
