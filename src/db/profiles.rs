use crate::db::codec::{decode_label_column, decode_timestamp, encode_label_list};
use crate::errors::AppResult;
use crate::models::profile::{NewProfile, PublicVolunteer, VolunteerProfile};
use crate::utils::time::now_storage;
use rusqlite::{Connection, OptionalExtension, Row, params};

const PROFILE_COLUMNS: &str =
    "id, user_id, skills, age, gender, contact_email, is_public, created_at";

fn map_profile(row: &Row) -> rusqlite::Result<VolunteerProfile> {
    let id: i64 = row.get("id")?;
    let skills = decode_label_column(row.get_ref("skills")?, &format!("profile {id}"));
    let created_at: String = row.get("created_at")?;

    Ok(VolunteerProfile {
        id,
        user_id: row.get("user_id")?,
        skills,
        age: row.get("age")?,
        gender: row.get("gender")?,
        contact_email: row.get("contact_email")?,
        is_public: row.get("is_public")?,
        created_at: decode_timestamp(&created_at, 7)?,
    })
}

pub fn insert_profile(
    conn: &Connection,
    user_id: i64,
    input: &NewProfile,
) -> AppResult<VolunteerProfile> {
    let sql = format!(
        "INSERT INTO volunteer_profiles (user_id, skills, age, gender, contact_email, is_public, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
         RETURNING {PROFILE_COLUMNS}"
    );
    let profile = conn.query_row(
        &sql,
        params![
            user_id,
            encode_label_list(&input.skills),
            input.age,
            input.gender,
            input.contact_email,
            now_storage(),
        ],
        map_profile,
    )?;
    Ok(profile)
}

pub fn find_profile(conn: &Connection, user_id: i64) -> AppResult<Option<VolunteerProfile>> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM volunteer_profiles WHERE user_id = ?1");
    Ok(conn.query_row(&sql, [user_id], map_profile).optional()?)
}

pub fn list_public_profiles(conn: &Connection) -> AppResult<Vec<PublicVolunteer>> {
    let mut stmt = conn.prepare(
        "SELECT id, skills, age, gender FROM volunteer_profiles
          WHERE is_public = 1
          ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get("id")?;
        let skills = decode_label_column(row.get_ref("skills")?, &format!("profile {id}"));
        Ok(PublicVolunteer {
            id,
            skills,
            age: row.get("age")?,
            gender: row.get("gender")?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
