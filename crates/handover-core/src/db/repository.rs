//! Handover repository implementation

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Device, Handover, HandoverId, Signatures, StaffDetails};
use libsql::{params, Connection, Row};

const HANDOVER_COLUMNS: &str = "id, full_name, staff_id, position, department, date_time,
    terms_accepted, staff_signature, admin_signature, submitted_at, created_at, updated_at";

/// Trait for handover storage operations.
///
/// Implementations persist records exactly as given; validation and id
/// assignment happen in [`crate::services::HandoverStore`].
#[allow(async_fn_in_trait)]
pub trait HandoverRepository {
    /// Insert a new handover with its devices
    async fn insert(&self, handover: &Handover) -> Result<()>;

    /// Get a handover by ID
    async fn get(&self, id: &HandoverId) -> Result<Option<Handover>>;

    /// Whether a handover with this ID is stored
    async fn exists(&self, id: &HandoverId) -> Result<bool>;

    /// List all handovers, newest `submitted_at` first
    async fn list(&self) -> Result<Vec<Handover>>;

    /// Overwrite a stored handover, replacing its devices.
    /// Returns `false` when no such record exists.
    async fn replace(&self, handover: &Handover) -> Result<bool>;

    /// Delete a handover and its devices.
    /// Returns `false` when no such record exists.
    async fn delete(&self, id: &HandoverId) -> Result<bool>;
}

/// libSQL implementation of `HandoverRepository`
pub struct LibSqlHandoverRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlHandoverRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Commit when the body succeeded, roll back otherwise
    async fn finish<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                if let Err(e) = self.conn.execute("COMMIT", ()).await {
                    self.conn.execute("ROLLBACK", ()).await.ok();
                    return Err(e.into());
                }
                Ok(value)
            }
            Err(e) => {
                self.conn.execute("ROLLBACK", ()).await.ok();
                Err(e)
            }
        }
    }

    async fn insert_devices(&self, id: &HandoverId, devices: &[Device]) -> Result<()> {
        for (position, device) in (0_i64..).zip(devices) {
            self.conn
                .execute(
                    "INSERT INTO devices (handover_id, position, id, device_type, brand, model, serial_number)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    params![
                        id.as_str(),
                        position,
                        device.id.as_str(),
                        device.effective_type(),
                        device.brand.as_str(),
                        device.model.as_str(),
                        device.serial_number.as_str()
                    ],
                )
                .await?;
        }
        Ok(())
    }

    async fn write_new(&self, handover: &Handover) -> Result<()> {
        let staff = &handover.staff_details;
        self.conn
            .execute(
                &format!(
                    "INSERT INTO handovers ({HANDOVER_COLUMNS})
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    handover.id.as_str(),
                    staff.full_name.as_str(),
                    staff.staff_id.as_str(),
                    staff.position.as_str(),
                    staff.department.as_str(),
                    staff.date_time.as_str(),
                    i64::from(handover.terms_accepted),
                    handover.signatures.staff_signature.as_str(),
                    handover.signatures.admin_signature.as_str(),
                    handover.submitted_at.as_str(),
                    handover.created_at,
                    handover.updated_at
                ],
            )
            .await?;

        self.insert_devices(&handover.id, &handover.devices).await
    }

    async fn write_replacement(&self, handover: &Handover) -> Result<bool> {
        let staff = &handover.staff_details;
        let rows = self
            .conn
            .execute(
                "UPDATE handovers SET
                    full_name = ?, staff_id = ?, position = ?, department = ?, date_time = ?,
                    terms_accepted = ?, staff_signature = ?, admin_signature = ?,
                    submitted_at = ?, updated_at = ?
                 WHERE id = ?",
                params![
                    staff.full_name.as_str(),
                    staff.staff_id.as_str(),
                    staff.position.as_str(),
                    staff.department.as_str(),
                    staff.date_time.as_str(),
                    i64::from(handover.terms_accepted),
                    handover.signatures.staff_signature.as_str(),
                    handover.signatures.admin_signature.as_str(),
                    handover.submitted_at.as_str(),
                    handover.updated_at,
                    handover.id.as_str()
                ],
            )
            .await?;

        if rows == 0 {
            return Ok(false);
        }

        self.conn
            .execute(
                "DELETE FROM devices WHERE handover_id = ?",
                params![handover.id.as_str()],
            )
            .await?;
        self.insert_devices(&handover.id, &handover.devices).await?;
        Ok(true)
    }

    async fn remove(&self, id: &HandoverId) -> Result<bool> {
        self.conn
            .execute(
                "DELETE FROM devices WHERE handover_id = ?",
                params![id.as_str()],
            )
            .await?;
        let rows = self
            .conn
            .execute("DELETE FROM handovers WHERE id = ?", params![id.as_str()])
            .await?;
        Ok(rows > 0)
    }

    async fn load_devices(&self, id: &HandoverId) -> Result<Vec<Device>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, device_type, brand, model, serial_number
                 FROM devices WHERE handover_id = ? ORDER BY position",
                params![id.as_str()],
            )
            .await?;

        let mut devices = Vec::new();
        while let Some(row) = rows.next().await? {
            devices.push(Self::parse_device(&row, 0)?);
        }
        Ok(devices)
    }

    async fn load_all_devices(&self) -> Result<HashMap<String, Vec<Device>>> {
        let mut rows = self
            .conn
            .query(
                "SELECT handover_id, id, device_type, brand, model, serial_number
                 FROM devices ORDER BY handover_id, position",
                (),
            )
            .await?;

        let mut devices: HashMap<String, Vec<Device>> = HashMap::new();
        while let Some(row) = rows.next().await? {
            let handover_id: String = row.get(0)?;
            devices
                .entry(handover_id)
                .or_default()
                .push(Self::parse_device(&row, 1)?);
        }
        Ok(devices)
    }

    /// Parse a device from a row whose device columns start at `offset`
    fn parse_device(row: &Row, offset: i32) -> Result<Device> {
        Ok(Device {
            id: row.get(offset)?,
            device_type: row.get(offset + 1)?,
            custom_device_type: None,
            brand: row.get(offset + 2)?,
            model: row.get(offset + 3)?,
            serial_number: row.get(offset + 4)?,
        })
    }

    /// Parse a handover (without devices) from a database row
    fn parse_handover(row: &Row) -> Result<Handover> {
        let id: String = row.get(0)?;
        Ok(Handover {
            id: HandoverId::from(id),
            staff_details: StaffDetails {
                full_name: row.get(1)?,
                staff_id: row.get(2)?,
                position: row.get(3)?,
                department: row.get(4)?,
                date_time: row.get(5)?,
            },
            devices: Vec::new(),
            terms_accepted: row.get::<i64>(6)? != 0,
            signatures: Signatures {
                staff_signature: row.get(7)?,
                admin_signature: row.get(8)?,
            },
            submitted_at: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl HandoverRepository for LibSqlHandoverRepository<'_> {
    async fn insert(&self, handover: &Handover) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", ()).await?;
        let result = self.write_new(handover).await;
        self.finish(result).await
    }

    async fn get(&self, id: &HandoverId) -> Result<Option<Handover>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {HANDOVER_COLUMNS} FROM handovers WHERE id = ?"),
                params![id.as_str()],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let mut handover = Self::parse_handover(&row)?;
        handover.devices = self.load_devices(id).await?;
        Ok(Some(handover))
    }

    async fn exists(&self, id: &HandoverId) -> Result<bool> {
        let mut rows = self
            .conn
            .query(
                "SELECT EXISTS(SELECT 1 FROM handovers WHERE id = ?)",
                params![id.as_str()],
            )
            .await?;

        Ok(match rows.next().await? {
            Some(row) => row.get::<i64>(0)? != 0,
            None => false,
        })
    }

    async fn list(&self) -> Result<Vec<Handover>> {
        let mut rows = self
            .conn
            .query(
                &format!(
                    "SELECT {HANDOVER_COLUMNS} FROM handovers
                     ORDER BY submitted_at DESC, created_at DESC"
                ),
                (),
            )
            .await?;

        let mut handovers = Vec::new();
        while let Some(row) = rows.next().await? {
            handovers.push(Self::parse_handover(&row)?);
        }

        let mut devices = self.load_all_devices().await?;
        for handover in &mut handovers {
            handover.devices = devices.remove(handover.id.as_str()).unwrap_or_default();
        }

        Ok(handovers)
    }

    async fn replace(&self, handover: &Handover) -> Result<bool> {
        self.conn.execute("BEGIN TRANSACTION", ()).await?;
        let result = self.write_replacement(handover).await;
        self.finish(result).await
    }

    async fn delete(&self, id: &HandoverId) -> Result<bool> {
        self.conn.execute("BEGIN TRANSACTION", ()).await?;
        let result = self.remove(id).await;
        self.finish(result).await
    }
}
