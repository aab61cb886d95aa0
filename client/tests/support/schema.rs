//! SQL installed into test databases: users table, upsert trigger, and the
//! `users_upsert` routine (plus deliberately broken variants).

use postgres::{Client, NoTls};

use super::format_postgres_error;

const CREATE_USERS_TABLE: &str = r"
CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    email TEXT NOT NULL UNIQUE
)";

const CREATE_UPSERT_TRIGGER: &str = r"
CREATE OR REPLACE FUNCTION users_upsert_on_insert() RETURNS trigger AS $$
BEGIN
    UPDATE users SET name = NEW.name, age = NEW.age WHERE email = NEW.email;
    IF FOUND THEN
        RETURN NULL;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

DROP TRIGGER IF EXISTS users_upsert_trigger ON users;
CREATE TRIGGER users_upsert_trigger
    BEFORE INSERT ON users
    FOR EACH ROW EXECUTE FUNCTION users_upsert_on_insert()";

// Swallows every insert without writing, so the post-write read finds
// nothing. Used to exercise the missing-row failure path.
const CREATE_SWALLOWING_TRIGGER: &str = r"
CREATE OR REPLACE FUNCTION users_swallow_insert() RETURNS trigger AS $$
BEGIN
    RETURN NULL;
END;
$$ LANGUAGE plpgsql;

DROP TRIGGER IF EXISTS users_upsert_trigger ON users;
CREATE TRIGGER users_upsert_trigger
    BEFORE INSERT ON users
    FOR EACH ROW EXECUTE FUNCTION users_swallow_insert()";

const CREATE_UPSERT_ROUTINE: &str = r"
CREATE OR REPLACE FUNCTION users_upsert(
    p_id integer,
    p_name text,
    p_age integer,
    p_email text
) RETURNS SETOF refcursor AS $$
DECLARE
    action_cur refcursor := 'users_upsert_action';
    id_cur refcursor := 'users_upsert_id';
    v_id integer := p_id;
    v_action text;
BEGIN
    IF v_id IS NULL THEN
        SELECT id INTO v_id FROM users WHERE email = p_email;
    END IF;

    IF v_id IS NULL THEN
        INSERT INTO users (name, age, email) VALUES (p_name, p_age, p_email)
            RETURNING id INTO v_id;
        v_action := 'insertado';
    ELSE
        UPDATE users SET name = p_name, age = p_age, email = p_email WHERE id = v_id;
        v_action := 'actualizado';
    END IF;

    OPEN action_cur FOR
        SELECT v_action AS accion, u.name, u.age, u.email
        FROM users u
        WHERE u.id = v_id;
    RETURN NEXT action_cur;

    OPEN id_cur FOR SELECT v_id AS id;
    RETURN NEXT id_cur;
END;
$$ LANGUAGE plpgsql";

// Same write path, but never opens the final-identifier cursor. The client
// must roll the transaction back, leaving the write invisible.
const CREATE_TRUNCATED_UPSERT_ROUTINE: &str = r"
CREATE OR REPLACE FUNCTION users_upsert(
    p_id integer,
    p_name text,
    p_age integer,
    p_email text
) RETURNS SETOF refcursor AS $$
DECLARE
    action_cur refcursor := 'users_upsert_action';
    v_id integer := p_id;
    v_action text;
BEGIN
    IF v_id IS NULL THEN
        SELECT id INTO v_id FROM users WHERE email = p_email;
    END IF;

    IF v_id IS NULL THEN
        INSERT INTO users (name, age, email) VALUES (p_name, p_age, p_email)
            RETURNING id INTO v_id;
        v_action := 'insertado';
    ELSE
        UPDATE users SET name = p_name, age = p_age, email = p_email WHERE id = v_id;
        v_action := 'actualizado';
    END IF;

    OPEN action_cur FOR
        SELECT v_action AS accion, u.name, u.age, u.email
        FROM users u
        WHERE u.id = v_id;
    RETURN NEXT action_cur;
END;
$$ LANGUAGE plpgsql";

/// Connect to a test database, panicking with a readable message on failure.
pub fn connect(url: &str) -> Client {
    Client::connect(url, NoTls)
        .unwrap_or_else(|err| panic!("connect to {url}: {}", format_postgres_error(&err)))
}

fn install(client: &mut Client, label: &str, sql: &str) {
    client
        .batch_execute(sql)
        .unwrap_or_else(|err| panic!("install {label}: {}", format_postgres_error(&err)));
}

/// Create the `users` table.
pub fn install_base_schema(client: &mut Client) {
    install(client, "users table", CREATE_USERS_TABLE);
}

/// Install the BEFORE INSERT trigger implementing upsert-by-email.
pub fn install_upsert_trigger(client: &mut Client) {
    install(client, "upsert trigger", CREATE_UPSERT_TRIGGER);
}

/// Replace the upsert trigger with one that swallows every insert.
pub fn install_swallowing_trigger(client: &mut Client) {
    install(client, "swallowing trigger", CREATE_SWALLOWING_TRIGGER);
}

/// Install the two-result-set `users_upsert` routine.
pub fn install_upsert_routine(client: &mut Client) {
    install(client, "users_upsert routine", CREATE_UPSERT_ROUTINE);
}

/// Replace `users_upsert` with a variant missing the final-identifier
/// result set.
pub fn install_truncated_upsert_routine(client: &mut Client) {
    install(
        client,
        "truncated users_upsert routine",
        CREATE_TRUNCATED_UPSERT_ROUTINE,
    );
}

/// Count persisted rows for an email.
pub fn count_rows_for_email(client: &mut Client, email: &str) -> i64 {
    client
        .query_one("SELECT COUNT(*) FROM users WHERE email = $1", &[&email])
        .unwrap_or_else(|err| panic!("count rows: {}", format_postgres_error(&err)))
        .get(0)
}

/// Fetch (id, name, age) for an email, panicking when the row is absent.
pub fn fetch_user(client: &mut Client, email: &str) -> (i32, String, i32) {
    let row = client
        .query_one(
            "SELECT id, name, age FROM users WHERE email = $1",
            &[&email],
        )
        .unwrap_or_else(|err| panic!("fetch user: {}", format_postgres_error(&err)));
    (row.get(0), row.get(1), row.get(2))
}
