//! Crate-level test doubles and BDD scenarios.

use mockall::mock;

use crate::error::AdminError;
use crate::transport::Transport;


pub(crate) const STATS_RESPONSE: &str = concat!(
    "# pxname,svname,qcur,status,weight,downtime,\n",
    "web,FRONTEND,,OPEN,,,\n",
    "web,srv1,0,UP,100,0,\n",
    "web,srv2,0,MAINT,50,3725,\n",
    "web,BACKEND,0,UP,150,0,\n",
);

mock! {
    pub(crate) Socket {}
    impl Transport for Socket {
        fn send(&self, command: &str) -> Result<Vec<u8>, AdminError>;
    }
}
