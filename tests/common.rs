// tests/common.rs
use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use tempfile::{tempdir, TempDir};

pub mod fixtures {
    use super::*;

    #[allow(dead_code)]
    pub fn scenario_one() -> Result<TempDir> {
        // src/a.cs, src/b.txt, src/sub/c.cs
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir(&src)?;
        File::create(src.join("a.cs"))?.write_all(b"class A {}")?;
        File::create(src.join("b.txt"))?.write_all(b"not code")?;
        let sub = src.join("sub");
        fs::create_dir(&sub)?;
        File::create(sub.join("c.cs"))?.write_all(b"class C {}")?;
        Ok(dir)
    }

    #[allow(dead_code)]
    pub fn scenario_obj_and_cs() -> Result<TempDir> {
        // x/y/z.obj, x/y/z.cs
        let dir = tempdir()?;
        let y = dir.path().join("x").join("y");
        fs::create_dir_all(&y)?;
        File::create(y.join("z.obj"))?.write_all(b"binary")?;
        File::create(y.join("z.cs"))?.write_all(b"class Z {}")?;
        Ok(dir)
    }
}
