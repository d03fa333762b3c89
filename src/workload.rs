use std::process;
use std::sync::Arc;

use anyhow::{Result, bail};

use crate::config::{Config, Workload};
use crate::database::Database;
use crate::partitioner::BatchCursor;

/// Values stored for a key, derived purely from the key itself so any read
/// can be verified without tracking what was written.
pub const fn row_values(pk: i64) -> (i64, i64) {
    (2 * pk, 3 * pk)
}

fn verify_row(pk: i64, read: (i64, i64)) -> Result<()> {
    let expected = row_values(pk);
    if read != expected {
        bail!("bad data for pk {pk}: got {read:?}, expected {expected:?}");
    }
    Ok(())
}

/// Runs `config.concurrency` workers over the full task range and waits for
/// all of them to drain the cursor. The first database error anywhere
/// terminates the whole process.
pub async fn run_pool(db: &Arc<Database>, config: &Arc<Config>, workload: Workload) -> Result<()> {
    let cursor = Arc::new(BatchCursor::new(config.tasks, config.batch_size));
    let mut handles = Vec::with_capacity(config.concurrency as usize);

    for _ in 0..config.concurrency {
        let db = db.clone();
        let cursor = cursor.clone();
        handles.push(tokio::spawn(async move {
            if let Err(err) = run_worker(&db, workload, &cursor).await {
                eprintln!("worker failed: {err:#}");
                process::exit(1);
            }
        }));
    }

    for handle in handles {
        handle.await?;
    }

    Ok(())
}

async fn run_worker(db: &Database, workload: Workload, cursor: &BatchCursor) -> Result<()> {
    while let Some(batch) = cursor.claim() {
        for pk in batch {
            if matches!(workload, Workload::Inserts | Workload::Mixed) {
                let (v1, v2) = row_values(pk);
                db.insert(pk, v1, v2).await?;
            }

            if matches!(workload, Workload::Selects | Workload::Mixed) {
                let read = db.select(pk).await?;
                verify_row(pk, read)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{row_values, verify_row};

    #[test]
    fn values_derive_from_key() {
        assert_eq!(row_values(0), (0, 0));
        assert_eq!(row_values(7), (14, 21));
        assert_eq!(row_values(1_000_000), (2_000_000, 3_000_000));
    }

    #[test]
    fn matching_read_passes_verification() {
        assert!(verify_row(7, (14, 21)).is_ok());
        assert!(verify_row(0, (0, 0)).is_ok());
    }

    #[test]
    fn mismatched_read_is_bad_data() {
        let err = verify_row(7, (13, 20)).unwrap_err();
        assert!(err.to_string().contains("bad data"));
        assert!(verify_row(7, (14, 20)).is_err());
    }
}
